//! Error types for the HTTP layer

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use research_core::error::ResearchError;
use serde_json::json;
use thiserror::Error;

/// Result type for request handlers
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced to API callers as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Research not found")]
    NotFound,

    #[error("Research not completed yet")]
    NotReady,

    #[error(transparent)]
    Internal(ResearchError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::NotReady => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ResearchError> for ApiError {
    fn from(err: ResearchError) -> Self {
        match err {
            ResearchError::Validation(message) => ApiError::BadRequest(message),
            ResearchError::NotFound(_) => ApiError::NotFound,
            ResearchError::NotReady(_) => ApiError::NotReady,
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_status() {
        let cases = [
            (ResearchError::Validation("Topic and questions are required".into()), StatusCode::BAD_REQUEST),
            (ResearchError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ResearchError::NotReady("x".into()), StatusCode::BAD_REQUEST),
            (ResearchError::Job("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_messages_drop_internal_prefixes() {
        let err = ApiError::from(ResearchError::Validation("Topic and questions are required".into()));
        assert_eq!(err.to_string(), "Topic and questions are required");
        assert_eq!(ApiError::from(ResearchError::NotFound("id".into())).to_string(), "Research not found");
        assert_eq!(
            ApiError::from(ResearchError::NotReady("id".into())).to_string(),
            "Research not completed yet"
        );
    }
}
