//! Domain error types for batch collection and the joke session.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("batch target must be at least 1")]
    InvalidTarget,

    #[error("gave up after {attempts} requests with {collected}/{target} unique jokes")]
    Exhausted {
        attempts: usize,
        collected: usize,
        target: usize,
    },

    #[error("joke source failed: {0:#}")]
    Source(#[source] anyhow::Error),
}

impl CollectError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CollectError::InvalidTarget => "invalid_target",
            CollectError::Exhausted { .. } => "exhausted",
            CollectError::Source(_) => "source",
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("a batch is already being fetched")]
    Busy,

    #[error("requested {requested} jokes, allowed range is 1..={max}")]
    InvalidTarget { requested: usize, max: usize },

    #[error("no batch loaded")]
    NoBatch,

    #[error("unknown joke id: {0}")]
    UnknownJoke(String),

    #[error("vote of {delta} on joke {id} is out of range")]
    VoteOutOfRange { id: String, delta: i64 },

    #[error(transparent)]
    Collect(#[from] CollectError),
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status = match &self {
            SessionError::Busy | SessionError::NoBatch => StatusCode::CONFLICT,
            SessionError::InvalidTarget { .. } | SessionError::VoteOutOfRange { .. } => {
                StatusCode::BAD_REQUEST
            }
            SessionError::UnknownJoke(_) => StatusCode::NOT_FOUND,
            SessionError::Collect(CollectError::InvalidTarget) => StatusCode::BAD_REQUEST,
            SessionError::Collect(_) => StatusCode::BAD_GATEWAY,
        };

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
