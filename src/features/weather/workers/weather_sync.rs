use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::core::error::Result;
use crate::features::regions::store::RegionStore;
use crate::features::weather::services::WeatherService;
use crate::features::weather::workers::ScheduledJob;

/// Outcome of one resync pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub refreshed: usize,
    pub failed: usize,
    pub cancelled: bool,
}

/// Refreshes cached upstream weather for regions that carry weather data
pub struct WeatherSyncJob {
    regions: Arc<dyn RegionStore>,
    weather: Arc<WeatherService>,
    batch_size: i64,
    /// Pause between upstream calls, derived from the rate limit
    spacing: Duration,
}

impl WeatherSyncJob {
    pub fn new(
        regions: Arc<dyn RegionStore>,
        weather: Arc<WeatherService>,
        batch_size: i64,
        spacing: Duration,
    ) -> Self {
        Self {
            regions,
            weather,
            batch_size,
            spacing,
        }
    }

    /// Refreshes one batch; stops between regions once `shutdown` fires
    pub async fn sync_batch(&self, shutdown: &CancellationToken) -> Result<SyncSummary> {
        let regions = self.regions.list_weather_regions(self.batch_size).await?;
        let mut summary = SyncSummary::default();

        if regions.is_empty() {
            tracing::info!("No regions with weather data to sync");
            return Ok(summary);
        }

        tracing::info!("Syncing weather for {} regions", regions.len());

        for (index, region) in regions.iter().enumerate() {
            if index > 0 && !self.spacing.is_zero() {
                tokio::select! {
                    _ = shutdown.cancelled() => {}
                    _ = tokio::time::sleep(self.spacing) => {}
                }
            }
            if shutdown.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            match self.weather.sync_region(&region.code).await {
                Ok(_) => summary.refreshed += 1,
                Err(e) => {
                    tracing::warn!("Failed to sync weather for {}: {:?}", region.code, e);
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            "Weather sync finished: refreshed={}, failed={}, cancelled={}",
            summary.refreshed,
            summary.failed,
            summary.cancelled
        );

        Ok(summary)
    }
}

#[async_trait]
impl ScheduledJob for WeatherSyncJob {
    fn name(&self) -> &'static str {
        "weather-sync"
    }

    async fn run(&self, shutdown: &CancellationToken) -> Result<()> {
        self.sync_batch(shutdown).await.map(|_| ())
    }
}
