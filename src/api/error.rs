//! API-layer error type with HTTP response mapping.
//!
//! Only errors that genuinely cannot produce a degraded render end up here:
//! bad input (400), unknown resources on the JSON endpoints (404), provider
//! outages on endpoints with no panel to degrade (503), and bugs (500).
//! Fetch failures during a render cycle are turned into error-annotated
//! [`crate::engine::RenderSpec`]s instead — see the handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::models::ValidationError;
use crate::providers::ProviderError;

/// Application error type with HTTP response mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid request data (400).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream provider unreachable (503).
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Internal server error (500).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = axum::Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Validation(e) => ApiError::BadRequest(e.to_string()),
            ProviderError::UnknownTicker(symbol) => {
                ApiError::NotFound(format!("unknown ticker '{symbol}'"))
            }
            ProviderError::Unavailable(msg) => ApiError::Unavailable(msg),
            ProviderError::Format(msg) => ApiError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
