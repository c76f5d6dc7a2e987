//! API Response types
//!
//! Every endpoint answers with the same envelope:
//! ```json
//! {
//!     "success": true,
//!     "message": "Order created successfully",
//!     "data": { ... }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Unified API response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
    /// Response payload, `null` when absent
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Create a successful response without payload
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Largest page size a list endpoint will return
pub const MAX_PAGE_SIZE: u32 = 100;
/// Page size used when none is requested
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Pagination metadata
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub limit: u32,
    /// Total number of items
    pub total: u64,
    /// Total number of pages
    pub total_pages: u32,
}

impl Pagination {
    /// Create a new pagination
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit)) as u32
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// List of items
    pub items: Vec<T>,
    /// Pagination metadata
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    /// Create a new paginated response
    pub fn new(items: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        Self {
            items,
            pagination: Pagination::new(page, limit, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages, 2);
        assert_eq!(Pagination::new(3, 100, 250).total_pages, 3);
        assert_eq!(Pagination::new(1, 0, 5).total_pages, 0);
    }

    #[test]
    fn test_envelope_serialize() {
        let json = serde_json::to_value(ApiResponse::success("OK", 42)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "OK");
        assert_eq!(json["data"], 42);

        let json = serde_json::to_value(ApiResponse::error("Order not found")).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["data"].is_null());
    }

    #[test]
    fn test_paginated_serialize() {
        let page = PaginatedResponse::new(vec!["a", "b"], 2, 2, 5);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["items"].as_array().unwrap().len(), 2);
        assert_eq!(json["pagination"]["limit"], 2);
        assert_eq!(json["pagination"]["total_pages"], 3);
    }
}
