use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Error payload returned for every failed request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, details: Option<Vec<String>>) -> Self {
        Self {
            error: error.into(),
            details,
        }
    }
}

/// Unpaginated listing: `{ data, total }`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        let total = data.len() as i64;
        Self { data, total }
    }
}

/// Paginated listing: `{ data, total, page, pageSize, totalPages }`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, page: &PageRequest) -> Self {
        Self {
            data,
            total,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages(total),
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Highest page whose offset fits in an `i64` at any allowed page size
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

/// Normalized page/limit pair. Malformed values never reject a request:
/// a bad page becomes 1, a bad or out-of-range limit becomes the default,
/// and a page past [`MAX_PAGE`] is pinned there so the offset cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: page.clamp(1, MAX_PAGE),
            page_size: normalize_limit(page_size),
        }
    }

    /// Builds a page request from raw query-string values
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page.and_then(|p| p.trim().parse::<i64>().ok()).unwrap_or(1);
        Self::new(page, parse_limit(limit))
    }

    /// SQL OFFSET for this page
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// `ceil(total / page_size)`
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.page_size - 1) / self.page_size
    }
}

/// Limit outside `1..=MAX_PAGE_SIZE` falls back to the default
pub fn normalize_limit(limit: i64) -> i64 {
    if (1..=MAX_PAGE_SIZE).contains(&limit) {
        limit
    } else {
        DEFAULT_PAGE_SIZE
    }
}

pub fn parse_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|l| l.trim().parse::<i64>().ok())
        .map(normalize_limit)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}
