//! HTTP error responses
//!
//! Every failure is rendered as `{"message": ..., "error": ...}` with the
//! status code chosen here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::Error;
use crate::store::StoreError;

/// Error body returned by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error returned from handlers
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub error: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 500 with the underlying error attached
    pub fn internal(message: impl Into<String>, error: impl ToString) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message).with_error(error)
    }

    /// Map a crate error to a response, using `context` as the 500 message
    pub fn from_error(context: &str, err: Error) -> Self {
        match err {
            e if e.is_quota() => Self::new(StatusCode::TOO_MANY_REQUESTS, "OpenAI API quota exceeded")
                .with_error("Please check your API key and billing details before trying again."),
            Error::Validation(e) => Self::bad_request("Invalid data").with_error(e),
            Error::Store(StoreError::DuplicateNiche { name }) => {
                Self::new(StatusCode::CONFLICT, format!("Niche '{name}' already exists"))
            }
            e => Self::internal(context, e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
                error: self.error,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ValidationError;
    use crate::llm::LlmError;

    #[test]
    fn test_quota_maps_to_429() {
        let err = ApiError::from_error("Failed", LlmError::QuotaExceeded.into());
        assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.message, "OpenAI API quota exceeded");
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err = ApiError::from_error("Failed", ValidationError::new("name", "required").into());
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.error.unwrap().contains("name"));
    }

    #[test]
    fn test_duplicate_maps_to_409() {
        let err = ApiError::from_error(
            "Failed",
            StoreError::DuplicateNiche {
                name: "Vlogging".to_string(),
            }
            .into(),
        );
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_other_maps_to_500_with_context() {
        let err = ApiError::from_error("Failed to analyze YouTube niches", LlmError::MissingApiKey.into());
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to analyze YouTube niches");
        assert!(err.error.is_some());
    }

    #[test]
    fn test_error_body_omits_empty_error() {
        let body = serde_json::to_value(ErrorBody {
            message: "Niche not found".to_string(),
            error: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"message": "Niche not found"}));
    }
}
