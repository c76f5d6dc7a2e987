//! Request extractors
//!
//! Malformed input is reported through the same envelope as every other
//! error instead of axum's plain-text rejections.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use super::AppError;

/// JSON body extractor whose rejection is a 400 "Invalid request body"
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                Err(AppError::invalid_body())
            }
        }
    }
}

/// Parse a path segment as a positive id
///
/// `resource` names the entity in the error message, e.g. "Invalid order ID".
pub fn parse_id(raw: &str, resource: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::invalid_id(resource)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "order").unwrap(), 42);

        let err = parse_id("abc", "order").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidId);
        assert_eq!(err.message, "Invalid order ID");

        assert!(parse_id("0", "customer").is_err());
        assert!(parse_id("-3", "customer").is_err());
        assert!(parse_id("", "customer").is_err());
    }
}
