//! Joke board session: owns the current batch and its loading state.
//!
//! Lifecycle: created `Empty`, moved to `Loading` by [`JokeSession::refresh`], then to
//! `Ready` (batch replaced wholesale) or `Failed`. Votes only touch a `Ready` batch.
//! At most one refresh runs at a time; a refresh that started always runs to the end,
//! even if the caller goes away.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use serde::Serialize;

use crate::error::{CollectError, SessionError};
use crate::jokes::config::JokesConfig;
use crate::jokes::{collect, Joke, JokeSource};
use crate::vote::{sorted_by_votes, vote, vote_overflows};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Empty,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
enum BatchState {
    Empty,
    Loading,
    Ready(Vec<Joke>),
    Failed(String),
}

#[derive(Debug)]
struct Inner {
    state: BatchState,
    generation: u64,
    fetched_at: Option<DateTime<Utc>>,
}

/// What the presentation layer renders: jokes are already sorted by votes.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub status: SessionStatus,
    pub generation: u64,
    pub fetched_at: Option<DateTime<Utc>>,
    pub jokes: Vec<Joke>,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct JokeSession {
    inner: Arc<RwLock<Inner>>,
    source: Arc<dyn JokeSource>,
    cfg: Arc<JokesConfig>,
}

impl JokeSession {
    pub fn new(source: Arc<dyn JokeSource>, cfg: JokesConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                state: BatchState::Empty,
                generation: 0,
                fetched_at: None,
            })),
            source,
            cfg: Arc::new(cfg),
        }
    }

    pub fn config(&self) -> &JokesConfig {
        &self.cfg
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|p| p.into_inner())
    }

    pub fn status(&self) -> SessionStatus {
        match self.read().state {
            BatchState::Empty => SessionStatus::Empty,
            BatchState::Loading => SessionStatus::Loading,
            BatchState::Ready(_) => SessionStatus::Ready,
            BatchState::Failed(_) => SessionStatus::Failed,
        }
    }

    pub fn snapshot(&self) -> SessionView {
        let g = self.read();
        let (status, jokes, error) = match &g.state {
            BatchState::Empty => (SessionStatus::Empty, Vec::new(), None),
            BatchState::Loading => (SessionStatus::Loading, Vec::new(), None),
            BatchState::Ready(items) => (SessionStatus::Ready, sorted_by_votes(items), None),
            BatchState::Failed(msg) => (SessionStatus::Failed, Vec::new(), Some(msg.clone())),
        };
        SessionView {
            status,
            generation: g.generation,
            fetched_at: g.fetched_at,
            jokes,
            error,
        }
    }

    /// Fetch a fresh batch of `target` jokes (configured batch size if `None`) and
    /// replace the current one. Returns the new batch sorted by votes.
    pub async fn refresh(&self, target: Option<usize>) -> Result<Vec<Joke>, SessionError> {
        let target = target.unwrap_or(self.cfg.batch_size);
        let max = self.cfg.max_batch_size;
        if target == 0 || target > max {
            return Err(SessionError::InvalidTarget {
                requested: target,
                max,
            });
        }

        {
            let mut g = self.write();
            if matches!(g.state, BatchState::Loading) {
                return Err(SessionError::Busy);
            }
            g.state = BatchState::Loading;
        }
        tracing::info!(target: "jokes", count = target, "refresh started");

        let this = self.clone();
        let opts = self.cfg.collect_options(target);
        let task = tokio::spawn(async move {
            let res = collect(this.source.as_ref(), opts).await;
            this.finish(res)
        });

        match task.await {
            Ok(res) => res,
            Err(e) => {
                let cause = anyhow::Error::new(e).context("collect task aborted");
                self.finish(Err(CollectError::Source(cause)))
            }
        }
    }

    fn finish(&self, res: Result<Vec<Joke>, CollectError>) -> Result<Vec<Joke>, SessionError> {
        let mut g = self.write();
        g.generation += 1;
        match res {
            Ok(batch) => {
                gauge!("jokes_batch_size").set(batch.len() as f64);
                let view = sorted_by_votes(&batch);
                g.state = BatchState::Ready(batch);
                g.fetched_at = Some(Utc::now());
                Ok(view)
            }
            Err(e) => {
                gauge!("jokes_batch_size").set(0.0);
                g.state = BatchState::Failed(e.to_string());
                g.fetched_at = None;
                Err(e.into())
            }
        }
    }

    /// Add `delta` votes to joke `id` in the current batch. Returns the batch sorted by votes.
    pub fn vote(&self, id: &str, delta: i64) -> Result<Vec<Joke>, SessionError> {
        let mut g = self.write();
        match &mut g.state {
            BatchState::Loading => Err(SessionError::Busy),
            BatchState::Empty | BatchState::Failed(_) => Err(SessionError::NoBatch),
            BatchState::Ready(items) => {
                if !items.iter().any(|j| j.id == id) {
                    return Err(SessionError::UnknownJoke(id.to_string()));
                }
                if vote_overflows(items, id, delta) {
                    return Err(SessionError::VoteOutOfRange {
                        id: id.to_string(),
                        delta,
                    });
                }
                *items = vote(items, id, delta);
                counter!("jokes_votes_total").increment(1);
                tracing::debug!(target: "jokes", id, delta, "vote applied");
                Ok(sorted_by_votes(items))
            }
        }
    }
}
