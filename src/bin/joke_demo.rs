//! Fetches one batch from the configured source and prints it, highest votes first.
//! Usage: `joke_demo [count]`

use anyhow::Context;
use joke_board::{init_tracing, JokeSession, JokesConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = JokesConfig::load_default()?;
    let count = std::env::args()
        .nth(1)
        .map(|s| s.parse::<usize>())
        .transpose()
        .context("count must be a positive integer")?;

    let source = cfg.build_source()?;
    let session = JokeSession::new(source, cfg);

    let jokes = session.refresh(count).await?;
    for j in &jokes {
        println!("[{:>3}] {}", j.votes, j.text);
    }
    Ok(())
}
