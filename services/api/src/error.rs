//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its
//! mapping onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::ConfigError;
use creatorhub_core::ports::StoreError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the storage port.
    #[error("Storage Error: {0}")]
    Store(#[from] StoreError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A request that failed validation. The message is returned verbatim.
    #[error("{0}")]
    Validation(String),

    /// A protected route was called without a bearer token.
    #[error("Access token required")]
    MissingToken,

    /// A protected route was called with a token that failed verification.
    #[error("Invalid token")]
    InvalidToken,

    /// The caller is authenticated but not allowed to touch this resource.
    #[error("{0}")]
    Forbidden(String),

    /// The requested document does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken | ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Config(_)
            | ApiError::Store(_)
            | ApiError::Io(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    /// Converts the error into a `{"error": "..."}` JSON response.
    ///
    /// Validation, auth and not-found errors carry their message to the
    /// client. Everything else is logged and collapsed into a generic
    /// message so internals never leak.
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Config(_) | ApiError::Store(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                tracing::error!("Internal error: {}", self);
                "Server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::Validation("All fields are required".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "All fields are required");
    }

    #[test]
    fn auth_errors_use_distinct_status_codes() {
        assert_eq!(ApiError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Forbidden("Access denied".to_string()).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn store_errors_are_hidden_from_clients() {
        let err = ApiError::Store(StoreError::Io("disk on fire".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
