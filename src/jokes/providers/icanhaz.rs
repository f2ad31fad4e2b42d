// src/jokes/providers/icanhaz.rs
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;

use crate::jokes::normalize_text;
use crate::jokes::types::{Joke, JokeSource};

pub const DEFAULT_URL: &str = "https://icanhazdadjoke.com/";

#[derive(Debug, Deserialize)]
struct JokeResponse {
    id: Option<String>,
    joke: Option<String>,
}

/// Parse one `application/json` response body from the joke API.
pub fn parse_joke_json(body: &str) -> Result<Joke> {
    let raw: JokeResponse = serde_json::from_str(body).context("parsing joke json")?;

    let id = raw
        .id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("joke response without id"))?;
    let text = normalize_text(raw.joke.as_deref().unwrap_or_default());
    if text.is_empty() {
        return Err(anyhow!("joke {id} has empty text"));
    }

    Ok(Joke::new(id, text))
}

/// Random-joke endpoint of icanhazdadjoke.com (or anything speaking the same JSON).
pub struct IcanhazSource {
    url: String,
    client: reqwest::Client,
    user_agent: String,
}

impl IcanhazSource {
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        user_agent: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building joke http client")?;
        Ok(Self {
            url: url.into(),
            client,
            user_agent: user_agent.into(),
        })
    }
}

#[async_trait]
impl JokeSource for IcanhazSource {
    async fn fetch_one(&self) -> Result<Joke> {
        let resp = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .with_context(|| format!("joke http get {}", self.url))?;

        let resp = resp.error_for_status().context("joke http status")?;
        let body = resp.text().await.context("joke http .text()")?;
        parse_joke_json(&body)
    }

    fn name(&self) -> &'static str {
        "icanhazdadjoke"
    }
}
