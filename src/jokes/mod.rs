// src/jokes/mod.rs
pub mod collector;
pub mod config;
pub mod providers;
pub mod types;

use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

pub use collector::{collect, CollectOptions};
pub use types::{Joke, JokeSource};

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "jokes_source_requests_total",
            "Single-joke requests issued to the source."
        );
        describe_counter!(
            "jokes_duplicates_total",
            "Jokes discarded because their id was already seen in the batch."
        );
        describe_counter!("jokes_collect_total", "Completed batch collections.");
        describe_counter!(
            "jokes_collect_failures_total",
            "Batch collections aborted by source errors or exhausted attempts."
        );
        describe_counter!("jokes_votes_total", "Votes applied to the current batch.");
        describe_histogram!("jokes_collect_ms", "Batch collection time in milliseconds.");
        describe_gauge!("jokes_batch_size", "Number of jokes in the current batch.");
    });
}

/// Normalize joke text: decode entities, collapse whitespace (incl. CRLF), trim.
pub fn normalize_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("whitespace regex"));
    re_ws.replace_all(&decoded, " ").trim().to_string()
}
