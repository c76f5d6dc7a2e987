//! Unified error system
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`AppError`]: Error type with code, message and optional payload
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Customer errors
//! - 4xxx: Order errors
//! - 5xxx: Invoice errors
//! - 6xxx: Menu errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::OrderNotFound);
//! assert_eq!(err.http_status(), shared::http::StatusCode::NOT_FOUND);
//!
//! let err = AppError::with_message(ErrorCode::OrderItemInvalid, "Item ID is required for item 0");
//! assert_eq!(err.http_status(), shared::http::StatusCode::BAD_REQUEST);
//! ```

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
