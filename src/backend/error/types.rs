/**
 * Backend Error Types
 *
 * This module defines error types specific to the HTTP server. These errors
 * are used in handlers and can be converted to HTTP responses.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Handler errors occur when processing HTTP requests: missing upload fields,
 * oversized files, wrong MIME types. They carry their own status code and a
 * user-facing message (the upload rejections keep the exact wording the
 * operator UI shows).
 *
 * ## Storage Errors
 *
 * Storage errors occur when every store in the document chain failed, or
 * when writing an uploaded object to the bucket failed. They surface as
 * HTTP 500 with a machine-readable `{error, details}` body.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., invalid upload, malformed request)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// User-facing error message
        message: String,
    },

    /// Document storage error (all stores in the chain failed)
    #[error("Storage error: {message}")]
    StorageError {
        /// Human-readable error message
        message: String,
        /// Underlying cause, included in the response body
        details: Option<String>,
    },

    /// Shared error (from the shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Filesystem error (file store, upload bucket)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Database error from the durable store
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>, details: Option<String>) -> Self {
        Self::StorageError {
            message: message.into(),
            details,
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - uses the status code from the error
    /// - `StorageError`, `SerializationError`, `IoError`, `DatabaseError` -
    ///   500 Internal Server Error
    /// - `SharedError` - 400 for validation, 500 otherwise
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::StorageError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::DocumentError { .. } => StatusCode::BAD_REQUEST,
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the user-facing error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::StorageError { message, .. } => message.clone(),
            Self::SharedError(err) => err.to_string(),
            Self::SerializationError(err) => err.to_string(),
            Self::IoError(err) => err.to_string(),
            Self::DatabaseError(err) => err.to_string(),
        }
    }

    /// Get the underlying cause, when one should be exposed to the caller
    pub fn details(&self) -> Option<String> {
        match self {
            Self::StorageError { details, .. } => details.clone(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error() {
        let error = BackendError::handler(StatusCode::BAD_REQUEST, "No file provided");
        match error {
            BackendError::HandlerError { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "No file provided");
            }
            _ => panic!("Expected HandlerError"),
        }
    }

    #[test]
    fn test_status_code_mapping() {
        let handler_error = BackendError::handler(StatusCode::BAD_REQUEST, "bad");
        assert_eq!(handler_error.status_code(), StatusCode::BAD_REQUEST);

        let storage_error = BackendError::storage("Failed to read data", None);
        assert_eq!(storage_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_storage_error_details() {
        let error = BackendError::storage("Failed to save data", Some("disk full".to_string()));
        assert_eq!(error.details().as_deref(), Some("disk full"));
        assert_eq!(error.message(), "Failed to save data");
    }

    #[test]
    fn test_from_shared_error() {
        let shared = SharedError::validation("participants", "empty");
        let backend: BackendError = shared.into();
        assert_eq!(backend.status_code(), StatusCode::BAD_REQUEST);
    }
}
