//! Shared types for the pizza ordering service
//!
//! Entity models, the error code taxonomy, the response envelope and
//! small utilities used by the server crate and its tests.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use response::{ApiResponse, PaginatedResponse, Pagination};
