use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::error::SessionError;
use crate::metrics::Metrics;
use crate::session::{JokeSession, SessionView};

#[derive(Clone)]
pub struct AppState {
    pub session: JokeSession,
}

/// Build the HTTP router. `/metrics` is mounted only when a recorder is installed.
pub fn router(state: AppState, metrics: Option<&Metrics>) -> Router {
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/jokes", get(list_jokes))
        .route("/jokes/refresh", post(refresh_jokes))
        .route("/jokes/{id}/vote", post(vote_joke));

    let app = match metrics {
        Some(m) => app.merge(m.router()),
        None => app,
    };

    app.layer(CorsLayer::very_permissive()).with_state(state)
}

async fn list_jokes(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.snapshot())
}

#[derive(Debug, Default, serde::Deserialize)]
struct RefreshReq {
    #[serde(default)]
    count: Option<usize>,
}

async fn refresh_jokes(
    State(state): State<AppState>,
    body: Option<Json<RefreshReq>>,
) -> Result<Json<SessionView>, SessionError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    state.session.refresh(req.count).await?;
    Ok(Json(state.session.snapshot()))
}

#[derive(Debug, serde::Deserialize)]
struct VoteReq {
    delta: i64,
}

async fn vote_joke(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<VoteReq>,
) -> Result<Json<SessionView>, SessionError> {
    state.session.vote(&id, body.delta)?;
    Ok(Json(state.session.snapshot()))
}
