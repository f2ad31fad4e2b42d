// src/jokes/collector.rs
//! Bounded, deduplicating batch collection.
//!
//! Pulls one joke at a time from a [`JokeSource`] until `target` distinct ids are
//! gathered. Requests are strictly sequential. Repeats are dropped and do not count
//! toward the target. Any source error aborts the whole batch.

use std::collections::HashSet;

use metrics::{counter, histogram};

use crate::error::CollectError;
use crate::jokes::types::{Joke, JokeSource};

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_ATTEMPTS_PER_ITEM: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectOptions {
    pub target: usize,
    /// Hard cap on source requests for one batch (duplicates included).
    pub max_attempts: usize,
}

impl CollectOptions {
    pub fn new(target: usize, attempts_per_item: usize) -> Self {
        Self {
            target,
            max_attempts: target.saturating_mul(attempts_per_item.max(1)),
        }
    }
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE, DEFAULT_ATTEMPTS_PER_ITEM)
    }
}

/// Collect `opts.target` unique jokes in arrival order, each with zero votes.
pub async fn collect(
    source: &dyn JokeSource,
    opts: CollectOptions,
) -> Result<Vec<Joke>, CollectError> {
    super::ensure_metrics_described();

    if opts.target == 0 {
        return Err(CollectError::InvalidTarget);
    }

    let t0 = std::time::Instant::now();
    let result = collect_inner(source, opts).await;
    histogram!("jokes_collect_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

    match &result {
        Ok(batch) => {
            counter!("jokes_collect_total").increment(1);
            tracing::info!(
                target: "jokes",
                source = source.name(),
                count = batch.len(),
                "batch collected"
            );
        }
        Err(e) => {
            counter!("jokes_collect_failures_total", "kind" => e.kind()).increment(1);
            tracing::warn!(target: "jokes", source = source.name(), error = %e, "batch failed");
        }
    }

    result
}

async fn collect_inner(
    source: &dyn JokeSource,
    opts: CollectOptions,
) -> Result<Vec<Joke>, CollectError> {
    let mut seen: HashSet<String> = HashSet::with_capacity(opts.target);
    let mut batch = Vec::with_capacity(opts.target);
    let mut attempts = 0usize;

    while batch.len() < opts.target {
        if attempts >= opts.max_attempts {
            return Err(CollectError::Exhausted {
                attempts,
                collected: batch.len(),
                target: opts.target,
            });
        }
        attempts += 1;

        counter!("jokes_source_requests_total").increment(1);
        let mut joke = source.fetch_one().await.map_err(CollectError::Source)?;

        if !seen.insert(joke.id.clone()) {
            counter!("jokes_duplicates_total").increment(1);
            tracing::debug!(target: "jokes", id = %joke.id, attempt = attempts, "duplicate joke");
            continue;
        }

        joke.votes = 0;
        batch.push(joke);
    }

    Ok(batch)
}
