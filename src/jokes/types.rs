// src/jokes/types.rs
use anyhow::Result;

/// A single joke as shown on the board. Identity is `id`; `votes` starts at 0.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Joke {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub votes: i64,
}

impl Joke {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            votes: 0,
        }
    }
}

/// Produces one candidate joke per call. Calls are issued strictly one at a time.
#[async_trait::async_trait]
pub trait JokeSource: Send + Sync {
    async fn fetch_one(&self) -> Result<Joke>;
    fn name(&self) -> &'static str;
}
