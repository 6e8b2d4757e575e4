//! Error types for the metrics cache service
//!
//! Cache operations themselves never fail: a miss is an `Option`. These
//! errors cover the HTTP layer, the metrics source and storage hooks.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the service layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No fresh entry cached for the entity
    #[error("No metrics cached for {0}")]
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

// == Source Error ==
/// Failure reported by a metrics source while fetching a sample.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source has no such entity
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// The source could not be reached or returned garbage
    #[error("Metrics source unavailable: {0}")]
    Unavailable(String),
}

// == Result Type Alias ==
/// Convenience Result type for the service layer.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (CacheError::NotFound("ns/pod".to_string()), StatusCode::NOT_FOUND),
            (CacheError::InvalidRequest("bad".to_string()), StatusCode::BAD_REQUEST),
            (CacheError::Internal("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected_status) in test_cases {
            assert_eq!(error.into_response().status(), expected_status);
        }
    }

    #[tokio::test]
    async fn test_error_body_is_json() {
        let response = CacheError::NotFound("ns/pod".to_string()).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["error"], "No metrics cached for ns/pod");
    }

    #[test]
    fn test_source_error_display() {
        let err = SourceError::Unavailable("timeout".to_string());
        assert_eq!(err.to_string(), "Metrics source unavailable: timeout");
    }
}
