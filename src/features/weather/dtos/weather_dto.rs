use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::regions::dtos::RegionSummaryDto;
use crate::features::weather::models::WeatherReading;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeatherResponseDto {
    pub region_code: String,
    /// Present when the region is known locally
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionSummaryDto>,
    pub current: WeatherReading,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponseDto {
    pub region_code: String,
    pub forecast: Vec<WeatherReading>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct WeatherSearchQuery {
    /// Region name to look for
    #[param(example = "semarang")]
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeatherSearchResponseDto {
    pub query: String,
    pub results: Vec<RegionSummaryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponseDto {
    pub message: String,
    pub region_code: String,
    /// Whether fresh upstream data replaced the cached copy
    pub refreshed: bool,
    pub records: usize,
}
