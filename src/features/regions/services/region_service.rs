use std::sync::Arc;
use std::time::Duration;

use crate::core::error::{AppError, Result};
use crate::features::regions::dtos::{
    ProvinceResponseDto, RegencyResponseDto, RegionSummaryDto, VillageResponseDto,
};
use crate::features::regions::models::{RegionCode, RegionLevel};
use crate::features::regions::store::{RegionSearch, RegionStore};
use crate::modules::cache::CacheStore;
use crate::shared::constants::{PROVINCES_CACHE_KEY, PROVINCES_CACHE_TTL_SECS};
use crate::shared::types::{ListResponse, PageRequest, PaginatedResponse};

/// Serialized response body and whether it came from the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedBody {
    pub body: String,
    pub cache_hit: bool,
}

/// A code that cannot name a region at `level` can have no children there
fn names_level(raw: &str, level: RegionLevel) -> bool {
    RegionCode::parse(raw).is_ok_and(|code| code.level() == level)
}

/// Service for browsing and searching the administrative hierarchy
pub struct RegionService {
    store: Arc<dyn RegionStore>,
    cache: Arc<dyn CacheStore>,
}

impl RegionService {
    pub fn new(store: Arc<dyn RegionStore>, cache: Arc<dyn CacheStore>) -> Self {
        Self { store, cache }
    }

    pub fn store(&self) -> &Arc<dyn RegionStore> {
        &self.store
    }

    // ==================== Listing Methods ====================

    /// Province listing as a ready-to-send JSON body, cached for 24 hours
    pub async fn list_provinces(&self) -> Result<CachedBody> {
        if let Some(body) = self.cache.get(PROVINCES_CACHE_KEY).await {
            tracing::debug!("Province list served from cache");
            return Ok(CachedBody {
                body,
                cache_hit: true,
            });
        }

        let provinces = self.store.list_provinces().await?;
        let response = ListResponse::new(
            provinces
                .into_iter()
                .map(ProvinceResponseDto::from)
                .collect(),
        );
        let body = serde_json::to_string(&response).map_err(|e| {
            tracing::error!("Failed to serialize province list: {:?}", e);
            AppError::Internal(format!("Failed to serialize province list: {}", e))
        })?;

        self.cache
            .set(
                PROVINCES_CACHE_KEY,
                &body,
                Duration::from_secs(PROVINCES_CACHE_TTL_SECS),
            )
            .await;

        Ok(CachedBody {
            body,
            cache_hit: false,
        })
    }

    /// Regencies of a province; an unknown province yields an empty list
    pub async fn list_regencies(
        &self,
        province_code: &str,
    ) -> Result<ListResponse<RegencyResponseDto>> {
        if !names_level(province_code, RegionLevel::Province) {
            return Ok(ListResponse::new(Vec::new()));
        }

        let regencies = self.store.list_regencies(province_code).await?;
        Ok(ListResponse::new(
            regencies
                .into_iter()
                .map(|r| RegencyResponseDto::from_region(r, province_code))
                .collect(),
        ))
    }

    /// One page of villages with weather data in a regency
    pub async fn list_villages(
        &self,
        regency_code: &str,
        page: PageRequest,
    ) -> Result<PaginatedResponse<VillageResponseDto>> {
        if !names_level(regency_code, RegionLevel::Regency) {
            return Ok(PaginatedResponse::new(Vec::new(), 0, &page));
        }

        let (villages, total) = self.store.list_villages(regency_code, &page).await?;
        let data = villages
            .into_iter()
            .map(|v| VillageResponseDto::from_region(v, regency_code))
            .collect();
        Ok(PaginatedResponse::new(data, total, &page))
    }

    // ==================== Search Methods ====================

    /// Name search across all levels with display names.
    ///
    /// A blank query is rejected; use [`RegionService::search_lenient`] where
    /// an empty result is preferred.
    pub async fn search(
        &self,
        query: &str,
        level: Option<i32>,
        limit: i64,
    ) -> Result<ListResponse<RegionSummaryDto>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Query parameter 'q' is required".to_string(),
            ));
        }

        let search = RegionSearch::new(query, level, limit);
        let regions = self.store.search(&search).await?;
        Ok(ListResponse::new(
            regions.into_iter().map(RegionSummaryDto::from).collect(),
        ))
    }

    /// Like [`RegionService::search`], but a blank query returns no results
    pub async fn search_lenient(&self, query: &str, limit: i64) -> Result<Vec<RegionSummaryDto>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.search(query, None, limit).await?.data)
    }
}
