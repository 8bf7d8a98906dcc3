//! Read-only access to the region hierarchy.
//!
//! Every query only ever sees active regions. The trait keeps the query
//! surface independent from Postgres so the flows above it can be exercised
//! against an in-memory store.

mod postgres;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::regions::models::Region;
use crate::shared::types::{normalize_limit, PageRequest};

pub use postgres::PgRegionStore;

/// Normalized free-text region search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSearch {
    /// Lowercased, trimmed query text
    pub query: String,
    pub level: Option<i32>,
    pub limit: i64,
}

impl RegionSearch {
    pub fn new(query: &str, level: Option<i32>, limit: i64) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            level,
            limit: normalize_limit(limit),
        }
    }

    /// `LIKE` pattern for a substring match on the lowercased name
    pub fn like_pattern(&self) -> String {
        let mut escaped = String::with_capacity(self.query.len() + 2);
        escaped.push('%');
        for ch in self.query.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        escaped.push('%');
        escaped
    }
}

#[async_trait]
pub trait RegionStore: Send + Sync {
    /// Active region by exact code; a missing row is `Ok(None)`
    async fn find_by_code(&self, code: &str) -> Result<Option<Region>>;

    /// Level-1 regions sorted by name
    async fn list_provinces(&self) -> Result<Vec<Region>>;

    /// Level-2 regions of a province sorted by name
    async fn list_regencies(&self, province_code: &str) -> Result<Vec<Region>>;

    /// One page of level-4 regions with weather data in a regency, plus the total count
    async fn list_villages(
        &self,
        regency_code: &str,
        page: &PageRequest,
    ) -> Result<(Vec<Region>, i64)>;

    /// Name search ordered by weather data first, deeper level first, then name
    async fn search(&self, search: &RegionSearch) -> Result<Vec<Region>>;

    /// Regions carrying weather data, sorted by code; feeds background resync
    async fn list_weather_regions(&self, limit: i64) -> Result<Vec<Region>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_normalizes_query() {
        let search = RegionSearch::new("  MaLaNg ", Some(2), 999);
        assert_eq!(search.query, "malang");
        assert_eq!(search.level, Some(2));
        assert_eq!(search.limit, 20);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(RegionSearch::new("malang", None, 20).like_pattern(), "%malang%");
        assert_eq!(
            RegionSearch::new("100%_a\\b", None, 20).like_pattern(),
            "%100\\%\\_a\\\\b%"
        );
    }
}
