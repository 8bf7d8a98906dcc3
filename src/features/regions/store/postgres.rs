use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::regions::models::{Region, RegionLevel};
use crate::features::regions::store::{RegionSearch, RegionStore};
use crate::shared::types::PageRequest;

const REGION_COLUMNS: &str = r#"
    id, code, name, level,
    province_code, province_name,
    regency_code, regency_name,
    district_code, district_name,
    village_code, village_name,
    has_weather_data, is_active, created_at, updated_at
"#;

/// Postgres-backed region store over the `regions` table
pub struct PgRegionStore {
    pool: PgPool,
}

impl PgRegionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegionStore for PgRegionStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Region>> {
        let sql = format!(
            "SELECT {} FROM regions WHERE code = $1 AND is_active = TRUE",
            REGION_COLUMNS
        );
        sqlx::query_as::<_, Region>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch region by code {}: {:?}", code, e);
                AppError::StoreUnavailable(e)
            })
    }

    async fn list_provinces(&self) -> Result<Vec<Region>> {
        let sql = format!(
            r#"
            SELECT {} FROM regions
            WHERE level = $1 AND is_active = TRUE
            ORDER BY name ASC
            "#,
            REGION_COLUMNS
        );
        sqlx::query_as::<_, Region>(&sql)
            .bind(RegionLevel::Province.as_i32())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch provinces: {:?}", e);
                AppError::StoreUnavailable(e)
            })
    }

    async fn list_regencies(&self, province_code: &str) -> Result<Vec<Region>> {
        let sql = format!(
            r#"
            SELECT {} FROM regions
            WHERE level = $1 AND province_code = $2 AND is_active = TRUE
            ORDER BY name ASC
            "#,
            REGION_COLUMNS
        );
        sqlx::query_as::<_, Region>(&sql)
            .bind(RegionLevel::Regency.as_i32())
            .bind(province_code)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to fetch regencies for province {}: {:?}",
                    province_code,
                    e
                );
                AppError::StoreUnavailable(e)
            })
    }

    async fn list_villages(
        &self,
        regency_code: &str,
        page: &PageRequest,
    ) -> Result<(Vec<Region>, i64)> {
        let sql = format!(
            r#"
            SELECT {} FROM regions
            WHERE level = $1 AND regency_code = $2
              AND has_weather_data = TRUE AND is_active = TRUE
            ORDER BY name ASC
            LIMIT $3 OFFSET $4
            "#,
            REGION_COLUMNS
        );
        let villages = sqlx::query_as::<_, Region>(&sql)
            .bind(RegionLevel::Village.as_i32())
            .bind(regency_code)
            .bind(page.page_size)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to fetch villages for regency {}: {:?}",
                    regency_code,
                    e
                );
                AppError::StoreUnavailable(e)
            })?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM regions
            WHERE level = $1 AND regency_code = $2
              AND has_weather_data = TRUE AND is_active = TRUE
            "#,
        )
        .bind(RegionLevel::Village.as_i32())
        .bind(regency_code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to count villages for regency {}: {:?}",
                regency_code,
                e
            );
            AppError::StoreUnavailable(e)
        })?;

        Ok((villages, total))
    }

    async fn search(&self, search: &RegionSearch) -> Result<Vec<Region>> {
        // NULL level means "any level"
        let sql = format!(
            r#"
            SELECT {} FROM regions
            WHERE is_active = TRUE
              AND LOWER(name) LIKE $1
              AND ($2::INTEGER IS NULL OR level = $2)
            ORDER BY has_weather_data DESC, level DESC, name ASC
            LIMIT $3
            "#,
            REGION_COLUMNS
        );
        sqlx::query_as::<_, Region>(&sql)
            .bind(search.like_pattern())
            .bind(search.level)
            .bind(search.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to search regions for '{}': {:?}", search.query, e);
                AppError::StoreUnavailable(e)
            })
    }

    async fn list_weather_regions(&self, limit: i64) -> Result<Vec<Region>> {
        let sql = format!(
            r#"
            SELECT {} FROM regions
            WHERE has_weather_data = TRUE AND is_active = TRUE
            ORDER BY code ASC
            LIMIT $1
            "#,
            REGION_COLUMNS
        );
        sqlx::query_as::<_, Region>(&sql)
            .bind(limit.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch weather regions: {:?}", e);
                AppError::StoreUnavailable(e)
            })
    }
}
