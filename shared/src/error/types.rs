//! Error types

use super::codes::ErrorCode;
use crate::response::ApiResponse;
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Application error with structured error code
///
/// Carries an optional `data` payload that is returned inside the envelope,
/// e.g. the existing invoice on a duplicate issuance.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional payload returned with the error
    pub data: Option<Value>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            data: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach a payload to this error
    ///
    /// A payload that fails to serialize is dropped.
    pub fn with_data<T: Serialize>(mut self, data: &T) -> Self {
        self.data = serde_json::to_value(data).ok();
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NotFound, format!("{} not found", resource.into()))
    }

    /// Create an invalid id error for a resource, e.g. "Invalid order ID"
    pub fn invalid_id(resource: &str) -> Self {
        Self::with_message(ErrorCode::InvalidId, format!("Invalid {resource} ID"))
    }

    /// Create an invalid body error
    pub fn invalid_body() -> Self {
        Self::new(ErrorCode::InvalidBody)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();

        // System errors are logged here, the client gets the generic message
        let message = if self.code.is_system() {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
            self.code.message().to_string()
        } else {
            self.message
        };

        let body = ApiResponse {
            success: false,
            message,
            data: self.data,
        };

        (status, Json(body)).into_response()
    }
}
