//! Input validation helpers
//!
//! Text length limits and the shared checks used by the CRUD handlers.
//! SQLite TEXT has no built-in length enforcement.

use shared::error::ErrorCode;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: customer, item, pizza, topping, beverage
pub const MAX_NAME_LEN: usize = 200;

/// Short text: phone numbers, sizes, base types
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Invoice notes
pub const MAX_NOTE_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    validate_max_len(value, field, max_len)
}

/// Validate that an optional string, if present, is non-empty and within the length limit.
pub fn validate_optional_required_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_required_text(v, field, max_len),
        None => Ok(()),
    }
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_max_len(v, field, max_len),
        None => Ok(()),
    }
}

/// Validate that a string is within the length limit.
pub fn validate_max_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that a price is a finite, non-negative number.
pub fn validate_price(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::PriceInvalid,
            format!("{field} cannot be negative"),
        ));
    }
    Ok(())
}
