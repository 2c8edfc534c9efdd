//! Error types for recordify-server
//!
//! Maps core and provider failures onto HTTP responses:
//! invalid identifiers are 400, unknown tags 404, provider failures 502.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recordify_common::IdentifierError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::playback::PlaybackError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Playback provider failure, passed through (502)
    #[error("Playback provider error: {0}")]
    Provider(#[from] PlaybackError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// recordify-common error
    #[error("Common error: {0}")]
    Common(#[from] recordify_common::Error),
}

impl From<IdentifierError> for ApiError {
    fn from(err: IdentifierError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Malformed, mistyped or missing request bodies share the JSON error shape
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Provider(ref err) => {
                warn!("Playback provider error: {}", err);
                (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", err.to_string())
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
            ApiError::Common(ref err) => match err {
                err if err.is_client_error() => {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.to_string())
                }
                recordify_common::Error::Database(_) => {
                    error!("Database error: {}", err);
                    (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", err.to_string())
                }
                _ => {
                    error!("Common error: {}", err);
                    (StatusCode::INTERNAL_SERVER_ERROR, "COMMON_ERROR", err.to_string())
                }
            },
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (IdentifierError::UnsupportedLink.into(), StatusCode::BAD_REQUEST),
            (
                recordify_common::Error::from(IdentifierError::MissingId).into(),
                StatusCode::BAD_REQUEST,
            ),
            (PlaybackError::NoDevice.into(), StatusCode::BAD_GATEWAY),
            (ApiError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                recordify_common::Error::Config("bad".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
