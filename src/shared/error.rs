//! Shared Error Types
//!
//! This module defines the errors produced by the pure domain code in
//! `shared`. The backend converts them into HTTP responses.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - A payload field failed a domain rule
//!
//! # Usage
//!
//! ```rust
//! use cookshare::shared::error::SharedError;
//!
//! let error = SharedError::validation("rating", "Rating must be between 0 and 5");
//! ```
use thiserror::Error;

/// Shared error types raised by domain validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Reject blank (empty or whitespace-only) required text fields.
///
/// Returns the trimmed value on success.
pub fn require_text(field: &str, value: &str) -> Result<String, SharedError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SharedError::validation(field, format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}
