//! Utilities: error types, response helpers, extractors, logging

pub mod error;
pub mod extract;
pub mod logger;
pub mod pagination;
pub mod validation;

pub use error::{ApiResult, AppError, AppResult, ErrorCode, created, ok};
pub use extract::{AppJson, parse_id};
pub use pagination::{PageRequest, PaginationParams};
