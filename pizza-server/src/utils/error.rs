//! Application error handling
//!
//! [`AppError`] and [`ErrorCode`] come from `shared::error`; this module adds
//! the success-side helpers that build the `{success, message, data}` envelope.

use axum::{Json, http::StatusCode};
use serde::Serialize;
use shared::response::ApiResponse;

pub use shared::error::{AppError, AppResult, ErrorCode};

/// 200 response with message and payload
pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::OK, Json(ApiResponse::success(message, data)))
}

/// 201 response with message and payload
pub fn created<T: Serialize>(
    message: impl Into<String>,
    data: T,
) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(message, data)))
}

/// Handler result carrying a status and an envelope
pub type ApiResult<T> = AppResult<(StatusCode, Json<ApiResponse<T>>)>;
