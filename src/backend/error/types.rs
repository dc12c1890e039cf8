/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP responses.
 *
 * # Error Types
 *
 * - `HandlerError` - Expected failures with a specific status (400, 401, 403, 404, 409)
 * - `Database` - sqlx failures
 * - `Internal` - Anything else that went wrong on the server
 * - `SharedError` - Domain validation errors from the shared module
 * - `SerializationError` - JSON encode/decode failures
 *
 * # Error Categories
 *
 * ## Expected failures
 *
 * Missing session, unknown document, ownership check failed, invalid input,
 * duplicate registration. These carry a short message that is safe to show
 * to the client.
 *
 * ## Internal failures
 *
 * Database, serialization and hashing errors. The detail is logged on the
 * server; the client only sees a static message.
 */
use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Message returned to clients for every 500 response
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use cookshare::backend::error::BackendError;
///
/// let err = BackendError::not_found("Cookbook not found");
/// let err = BackendError::forbidden("Only the owner can edit this cookbook");
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Expected failure with a client-facing message
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unexpected server-side failure
    #[error("Internal error: {message}")]
    Internal {
        /// Detail for the server log
        message: String,
    },

    /// Shared error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    /// 401 Unauthorized
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    /// 403 Forbidden
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// 409 Conflict
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::CONFLICT, message)
    }

    /// Create an internal error; the message is logged, never returned
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `SharedError::ValidationError` - 400 Bad Request
    /// - Everything else - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            },
            Self::Database(_) | Self::Internal { .. } | Self::SerializationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the detail must stay on the server
    pub fn is_internal(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Get the client-facing error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}
