//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

const MAX_PER_PAGE: u32 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page (capped at 100).
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * self.limit()
    }

    /// Returns the limit for database queries, capped at the maximum page size.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page.clamp(1, MAX_PER_PAGE))
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    /// Creates a paginated response from a page of items and a total count.
    #[must_use]
    pub fn new(data: Vec<T>, request: &PageRequest, total: u64) -> Self {
        let limit = request.limit();
        let total_pages = total.div_ceil(limit);
        Self {
            data,
            meta: PageMeta {
                page: request.page,
                per_page: request.per_page,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_first_page() {
        let req = PageRequest {
            page: 1,
            per_page: 20,
        };
        assert_eq!(req.offset(), 0);
        assert_eq!(req.limit(), 20);
    }

    #[test]
    fn test_offset_later_page() {
        let req = PageRequest {
            page: 3,
            per_page: 25,
        };
        assert_eq!(req.offset(), 50);
    }

    #[test]
    fn test_per_page_is_capped() {
        let req = PageRequest {
            page: 1,
            per_page: 5000,
        };
        assert_eq!(req.limit(), 100);
    }

    #[test]
    fn test_page_response_meta() {
        let req = PageRequest {
            page: 2,
            per_page: 10,
        };
        let resp = PageResponse::new(vec![1, 2, 3], &req, 23);
        assert_eq!(resp.meta.total_pages, 3);
        assert_eq!(resp.meta.total, 23);
        assert_eq!(resp.data.len(), 3);
    }
}
