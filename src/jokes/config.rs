// src/jokes/config.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::jokes::collector::{CollectOptions, DEFAULT_ATTEMPTS_PER_ITEM, DEFAULT_BATCH_SIZE};
use crate::jokes::providers::{icanhaz, FixtureSource, IcanhazSource};
use crate::jokes::types::JokeSource;

pub const DEFAULT_CONFIG_PATH: &str = "config/jokes.toml";

pub const ENV_CONFIG_PATH: &str = "JOKES_CONFIG_PATH";
pub const ENV_BATCH_SIZE: &str = "JOKES_BATCH_SIZE";
pub const ENV_SOURCE: &str = "JOKES_SOURCE";
pub const ENV_SOURCE_URL: &str = "JOKES_SOURCE_URL";
pub const ENV_FIXTURE_PATH: &str = "JOKES_FIXTURE_PATH";

const DEFAULT_MAX_BATCH_SIZE: usize = 50;
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Http,
    Fixture,
}

impl std::str::FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(SourceKind::Http),
            "fixture" => Ok(SourceKind::Fixture),
            other => Err(anyhow!("unsupported joke source: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JokesConfig {
    /// Jokes per batch when the caller doesn't ask for a count.
    pub batch_size: usize,
    /// Upper bound accepted from API callers.
    pub max_batch_size: usize,
    /// Request budget per wanted joke; caps the dedup loop.
    pub attempts_per_item: usize,
    pub source: SourceKind,
    pub source_url: String,
    pub fixture_path: Option<PathBuf>,
    pub request_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for JokesConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            attempts_per_item: DEFAULT_ATTEMPTS_PER_ITEM,
            source: SourceKind::Http,
            source_url: icanhaz::DEFAULT_URL.to_string(),
            fixture_path: None,
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: default_user_agent(),
        }
    }
}

impl JokesConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: JokesConfig = toml::from_str(s).context("parsing jokes config toml")?;
        cfg.sanitize();
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading jokes config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Resolve config with env + fallbacks, then apply env overrides:
    /// 1) $JOKES_CONFIG_PATH (must exist)
    /// 2) config/jokes.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                bail!("{ENV_CONFIG_PATH} points to non-existent path {}", pb.display());
            }
            Self::load_from(&pb)?
        } else {
            let p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if p.exists() {
                Self::load_from(&p)?
            } else {
                Self::default()
            }
        };

        cfg.apply_env_overrides()?;
        cfg.sanitize();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(v) = std::env::var(ENV_BATCH_SIZE) {
            let n: usize = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_BATCH_SIZE} must be a positive integer"))?;
            let max = self.max_batch_size.max(1);
            if n == 0 || n > max {
                bail!("{ENV_BATCH_SIZE}={n} is outside 1..={max}");
            }
            self.batch_size = n;
        }
        if let Ok(v) = std::env::var(ENV_SOURCE) {
            self.source = v.parse()?;
        }
        if let Ok(v) = std::env::var(ENV_SOURCE_URL) {
            self.source_url = v.trim().to_string();
        }
        if let Ok(v) = std::env::var(ENV_FIXTURE_PATH) {
            self.fixture_path = Some(PathBuf::from(v));
            self.source = SourceKind::Fixture;
        }
        Ok(())
    }

    fn sanitize(&mut self) {
        if self.max_batch_size == 0 {
            self.max_batch_size = DEFAULT_MAX_BATCH_SIZE;
        }
        self.batch_size = self.batch_size.clamp(1, self.max_batch_size);
        self.attempts_per_item = self.attempts_per_item.max(1);
        if self.request_timeout_ms == 0 {
            self.request_timeout_ms = DEFAULT_TIMEOUT_MS;
        }
        if self.source_url.trim().is_empty() {
            self.source_url = icanhaz::DEFAULT_URL.to_string();
        }
        if self.user_agent.trim().is_empty() {
            self.user_agent = default_user_agent();
        }
    }

    pub fn collect_options(&self, target: usize) -> CollectOptions {
        CollectOptions::new(target, self.attempts_per_item)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Build the configured joke source.
    pub fn build_source(&self) -> Result<Arc<dyn JokeSource>> {
        match self.source {
            SourceKind::Http => Ok(Arc::new(IcanhazSource::new(
                self.source_url.clone(),
                self.request_timeout(),
                self.user_agent.clone(),
            )?)),
            SourceKind::Fixture => {
                let path = self
                    .fixture_path
                    .as_deref()
                    .ok_or_else(|| anyhow!("fixture source selected without fixture_path"))?;
                Ok(Arc::new(FixtureSource::from_json_file(path)?))
            }
        }
    }
}
