//! Error types
//!
//! Cache operations themselves never fail. `CacheError` covers the admin HTTP
//! surface and `UpstreamError` covers the external collaborators.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Errors returned by the admin API.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No live entry for the requested key
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

/// Convenience Result type for admin handlers.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Upstream Error Enum ==
/// Failure reported by a text-generation or streaming-platform collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// Access token rejected (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limited (HTTP 429), optionally with the server's retry hint
    #[error("Rate limited")]
    RateLimited { retry_after: Option<Duration> },

    /// Any other non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection-level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl UpstreamError {
    /// Transient failures worth retrying with backoff.
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::RateLimited { .. } | UpstreamError::Transport(_) => true,
            UpstreamError::Http { status, .. } => *status >= 500,
            UpstreamError::Unauthorized(_) | UpstreamError::InvalidResponse(_) => false,
        }
    }
}
