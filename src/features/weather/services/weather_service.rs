use std::sync::Arc;

use crate::core::error::Result;
use crate::features::regions::dtos::RegionSummaryDto;
use crate::features::regions::models::RegionCode;
use crate::features::regions::RegionService;
use crate::features::weather::models::{current_from, forecast_from, CurrentWeather, WeatherReading};
use crate::modules::bmkg::BmkgClient;
use crate::shared::constants::DEFAULT_PAGE_SIZE;

/// Resolves current conditions and forecasts for a region code
pub struct WeatherService {
    regions: Arc<RegionService>,
    bmkg: Arc<BmkgClient>,
}

impl WeatherService {
    pub fn new(regions: Arc<RegionService>, bmkg: Arc<BmkgClient>) -> Self {
        Self { regions, bmkg }
    }

    /// Current weather for a region.
    ///
    /// The local lookup only annotates the response: known and unknown
    /// codes go through the same upstream fetch. A store failure is an error
    /// here; callers recover with [`WeatherService::fetch_current_direct`].
    pub async fn resolve_current_weather(&self, code: &RegionCode) -> Result<CurrentWeather> {
        let region = self.regions.store().find_by_code(code.as_str()).await?;
        if region.is_none() {
            tracing::debug!("Region {} not in store, fetching weather anyway", code);
        }

        let records = self.bmkg.fetch_weather(code.as_str()).await?;
        let current = current_from(code.as_str(), &records)?;

        Ok(CurrentWeather { region, current })
    }

    /// Current weather straight from upstream, without touching the region store
    pub async fn fetch_current_direct(&self, code: &RegionCode) -> Result<WeatherReading> {
        let records = self.bmkg.fetch_weather(code.as_str()).await?;
        current_from(code.as_str(), &records)
    }

    /// Forecast window; records with bad timestamps are skipped
    pub async fn resolve_forecast(&self, code: &RegionCode) -> Result<Vec<WeatherReading>> {
        let records = self.bmkg.fetch_weather(code.as_str()).await?;
        Ok(forecast_from(&records))
    }

    /// Region search for the weather UI; a blank query yields no results
    pub async fn search_regions(&self, query: &str) -> Result<Vec<RegionSummaryDto>> {
        self.regions.search_lenient(query, DEFAULT_PAGE_SIZE).await
    }

    /// Re-fetches upstream data into the cache, returning the record count
    pub async fn sync_region(&self, code: &str) -> Result<usize> {
        let records = self.bmkg.refresh_weather(code).await?;
        tracing::debug!("Refreshed {} weather records for {}", records.len(), code);
        Ok(records.len())
    }
}
