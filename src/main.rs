//! Joke board service: binary entrypoint.
//! Loads config, builds the joke session, kicks off the first batch, and serves the API.

use joke_board::metrics::Metrics;
use joke_board::{build_state, init_tracing, router, JokesConfig};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = JokesConfig::load_default()?;
    let state = build_state(cfg)?;

    let metrics = match Metrics::init() {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::warn!(error = ?e, "metrics disabled");
            None
        }
    };

    // First batch loads in the background; clients see `loading` until it lands.
    let session = state.session.clone();
    tokio::spawn(async move {
        if let Err(e) = session.refresh(None).await {
            tracing::warn!(error = %e, "initial joke batch failed");
        }
    });

    let router = router(state, metrics.as_ref());
    Ok(router.into())
}
