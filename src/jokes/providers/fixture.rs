// src/jokes/providers/fixture.rs
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use crate::jokes::normalize_text;
use crate::jokes::types::{Joke, JokeSource};

/// Replays a fixed list of jokes in order, wrapping around at the end.
/// Handy offline and in tests; ids repeat once the list cycles.
pub struct FixtureSource {
    jokes: Vec<Joke>,
    cursor: AtomicUsize,
}

impl FixtureSource {
    pub fn from_jokes<I, S, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let jokes = entries
            .into_iter()
            .map(|(id, text)| Joke::new(id, text))
            .collect();
        Self {
            jokes,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Load a JSON array of `{ "id": ..., "joke": ... }` objects.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading joke fixture from {}", path.display()))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        #[derive(serde::Deserialize)]
        struct Entry {
            id: String,
            joke: String,
        }
        let entries: Vec<Entry> = serde_json::from_str(s).context("parsing joke fixture json")?;
        Ok(Self::from_jokes(
            entries
                .into_iter()
                .map(|e| (e.id, normalize_text(&e.joke))),
        ))
    }

    pub fn len(&self) -> usize {
        self.jokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jokes.is_empty()
    }
}

#[async_trait]
impl JokeSource for FixtureSource {
    async fn fetch_one(&self) -> Result<Joke> {
        if self.jokes.is_empty() {
            return Err(anyhow!("joke fixture is empty"));
        }
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % self.jokes.len();
        Ok(self.jokes[i].clone())
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
