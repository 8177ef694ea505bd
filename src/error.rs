//! Unified error handling for the nichepulse crate
//!
//! This module provides a unified error type that consolidates the
//! domain-specific errors into a single `Error` enum, while keeping the
//! domain errors available where callers need the detail.
//!
//! # Architecture
//!
//! - [`ClassifiedError`] - Common interface implemented by the unified error
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors

use std::io;
use thiserror::Error;

pub use crate::analysis::ValidationError;
pub use crate::config::ConfigError;
pub use crate::llm::LlmError;
pub use crate::store::StoreError;

/// Common interface for classifying errors
pub trait ClassifiedError: std::error::Error {
    /// Check if this error is recoverable (a later attempt may succeed)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout, quota)
    Network,
    /// AI output that could not be used
    Llm,
    /// Rejected input
    Validation,
    /// Storage and I/O errors
    Storage,
    /// Configuration errors
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Llm => "llm",
            Self::Validation => "validation",
            Self::Storage => "storage",
            Self::Config => "config",
            Self::Other => "other",
        }
    }
}

/// Unified error type for the nichepulse crate
#[derive(Error, Debug)]
pub enum Error {
    /// AI service errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// AI output or request body failed validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ClassifiedError for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Llm(e) => e.is_recoverable() || e.is_quota(),
            Self::Validation(_) => true, // the model may answer differently next time
            Self::Store(StoreError::Io { .. }) => true,
            Self::Store(_) => false,
            Self::Config(_) => false,
            Self::Io(_) => true,
            Self::Json(_) => false,
            Self::Other { .. } => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Llm(LlmError::Decode { .. }) => ErrorCategory::Llm,
            Self::Llm(LlmError::MissingApiKey) => ErrorCategory::Config,
            Self::Llm(_) => ErrorCategory::Network,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Store(_) | Self::Io(_) => ErrorCategory::Storage,
            Self::Json(_) => ErrorCategory::Llm,
            Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Whether the AI provider rejected the call for quota reasons
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::Llm(e) if e.is_quota())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let quota: Error = LlmError::QuotaExceeded.into();
        assert_eq!(quota.category(), ErrorCategory::Network);

        let missing: Error = LlmError::MissingApiKey.into();
        assert_eq!(missing.category(), ErrorCategory::Config);

        let invalid: Error = ValidationError::new("niches", "required").into();
        assert_eq!(invalid.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_is_quota() {
        let quota: Error = LlmError::QuotaExceeded.into();
        assert!(quota.is_quota());
        assert!(quota.is_recoverable());

        let other = Error::other("boom");
        assert!(!other.is_quota());
        assert!(!other.is_recoverable());
    }

    #[test]
    fn test_duplicate_is_not_recoverable() {
        let err: Error = StoreError::DuplicateNiche {
            name: "Vlogging".to_string(),
        }
        .into();
        assert!(!err.is_recoverable());
        assert_eq!(err.category(), ErrorCategory::Storage);
    }

    #[test]
    fn test_with_source_keeps_chain() {
        let io = io::Error::new(io::ErrorKind::Other, "disk full");
        let err = Error::with_source("saving snapshot", io);
        assert_eq!(err.to_string(), "saving snapshot");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_category_names() {
        assert_eq!(ErrorCategory::Network.as_str(), "network");
        assert_eq!(ErrorCategory::Storage.as_str(), "storage");
    }
}
