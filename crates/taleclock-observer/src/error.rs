//! Error types for the control API.
//!
//! [`ObserverError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use taleclock_core::clock::ClockError;

/// Errors that can occur in the control API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The request was well-formed but cannot be applied to the clock.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ClockError> for ObserverError {
    fn from(err: ClockError) -> Self {
        match err {
            ClockError::TimestampOverflow => Self::InvalidRequest(err.to_string()),
            ClockError::InvalidConfig { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidRequest(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
