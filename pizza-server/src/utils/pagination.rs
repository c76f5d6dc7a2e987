//! Pagination query handling
//!
//! `page` and `limit` are read leniently: a missing or unparseable value
//! falls back to the default rather than failing the request.

use serde::Deserialize;
use shared::response::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Raw `?page=&limit=` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Normalized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Row offset for SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    /// page < 1 becomes 1; limit is clamped to 1..=100, default 10
    pub fn resolve(&self) -> PageRequest {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .map(|p| p.clamp(1, i64::from(u32::MAX)) as u32)
            .unwrap_or(1);

        let limit = self
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<i64>().ok())
            .map(|l| l.clamp(1, i64::from(MAX_PAGE_SIZE)) as u32)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        PageRequest { page, limit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, limit: Option<&str>) -> PaginationParams {
        PaginationParams {
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(params(None, None).resolve(), PageRequest { page: 1, limit: 10 });
        assert_eq!(
            params(Some("x"), Some("y")).resolve(),
            PageRequest { page: 1, limit: 10 }
        );
    }

    #[test]
    fn test_clamping() {
        assert_eq!(params(Some("0"), Some("500")).resolve(), PageRequest { page: 1, limit: 100 });
        assert_eq!(params(Some("-2"), Some("0")).resolve(), PageRequest { page: 1, limit: 1 });
        assert_eq!(params(Some("3"), Some("25")).resolve(), PageRequest { page: 3, limit: 25 });
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest { page: 1, limit: 10 }.offset(), 0);
        assert_eq!(PageRequest { page: 3, limit: 25 }.offset(), 50);
    }
}
