// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod error;
pub mod jokes;
pub mod metrics;
pub mod session;
pub mod vote;

pub use crate::api::{router, AppState};
pub use crate::error::{CollectError, SessionError};
pub use crate::jokes::config::JokesConfig;
pub use crate::jokes::{collect, CollectOptions, Joke, JokeSource};
pub use crate::session::{JokeSession, SessionStatus, SessionView};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber.
/// Filter comes from `RUST_LOG` (default `joke_board=info,warn`); `LOG_FORMAT=json`
/// switches to JSON lines. A no-op if a subscriber is already set (e.g. by the runtime).
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("joke_board=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };

    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Build a session from config (source included), ready to be served.
pub fn build_state(cfg: JokesConfig) -> anyhow::Result<AppState> {
    let source = cfg.build_source()?;
    tracing::info!(
        source = source.name(),
        batch_size = cfg.batch_size,
        attempts_per_item = cfg.attempts_per_item,
        "joke source ready"
    );
    Ok(AppState {
        session: JokeSession::new(source, cfg),
    })
}
