use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::leaderboard::{LeaderboardError, LeaderboardService};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub leaderboard: Arc<LeaderboardService>,
}

impl AppState {
    pub fn new(leaderboard: Arc<LeaderboardService>) -> Self {
        Self { leaderboard }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl From<LeaderboardError> for AppError {
    fn from(error: LeaderboardError) -> Self {
        match error {
            LeaderboardError::InvalidArgument(msg) => AppError::BadRequest(msg),
            LeaderboardError::NotFound(msg) => AppError::NotFound(msg),
            LeaderboardError::StoreUnavailable(store_error) => {
                error!(error = %store_error, "Score store unavailable");
                AppError::Unavailable(store_error.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Store unavailable: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
