use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::BmkgConfig;
use crate::core::error::{AppError, Result};
use crate::modules::bmkg::models::{BmkgWeatherRecord, BmkgWeatherResponse};
use crate::modules::cache::CacheStore;
use crate::shared::constants::{weather_cache_key, WEATHER_CACHE_TTL_SECS};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "EamagineWeather/1.0";

/// HTTP client for BMKG weather forecasts with cache-aside reads
pub struct BmkgClient {
    client: reqwest::Client,
    base_url: String,
    cache: Arc<dyn CacheStore>,
}

impl BmkgClient {
    pub fn new(config: &BmkgConfig, cache: Arc<dyn CacheStore>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    /// Weather records for a region, newest first.
    ///
    /// Served from the cache when present; otherwise fetched upstream and
    /// cached for 30 minutes.
    pub async fn fetch_weather(&self, region_code: &str) -> Result<Vec<BmkgWeatherRecord>> {
        let cache_key = weather_cache_key(region_code);

        if let Some(cached) = self.cache.get(&cache_key).await {
            match serde_json::from_str::<BmkgWeatherResponse>(&cached) {
                Ok(response) => {
                    tracing::debug!("Weather cache hit for {}", region_code);
                    return Ok(response.data);
                }
                Err(e) => {
                    tracing::warn!(
                        "Discarding unreadable cached weather for {}: {}",
                        region_code,
                        e
                    );
                }
            }
        }

        self.refresh_weather(region_code).await
    }

    /// Fetches from upstream regardless of the cache, then repopulates it
    pub async fn refresh_weather(&self, region_code: &str) -> Result<Vec<BmkgWeatherRecord>> {
        let (raw, response) = self.request(region_code).await?;

        self.cache
            .set(
                &weather_cache_key(region_code),
                &raw,
                Duration::from_secs(WEATHER_CACHE_TTL_SECS),
            )
            .await;

        Ok(response.data)
    }

    /// Raw body plus its decoded form
    async fn request(&self, region_code: &str) -> Result<(String, BmkgWeatherResponse)> {
        let url = format!("{}/prakiraan-cuaca", self.base_url);
        tracing::debug!("Fetching BMKG weather for {} from {}", region_code, url);

        let response = self
            .client
            .get(&url)
            .query(&[("adm4", region_code)])
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamUnavailable(format!(
                    "BMKG request for {} failed: {}",
                    region_code, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "BMKG API returned status {} for {}",
                status, region_code
            )));
        }

        let raw = response.text().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!(
                "Failed to read BMKG response for {}: {}",
                region_code, e
            ))
        })?;

        let decoded = serde_json::from_str::<BmkgWeatherResponse>(&raw).map_err(|e| {
            AppError::UpstreamDecode(format!(
                "Failed to decode BMKG response for {}: {}",
                region_code, e
            ))
        })?;

        Ok((raw, decoded))
    }
}
