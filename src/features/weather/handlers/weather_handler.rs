use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::regions::dtos::RegionSummaryDto;
use crate::features::regions::models::RegionCode;
use crate::features::weather::dtos::{
    CurrentWeatherResponseDto, ForecastResponseDto, SyncResponseDto, WeatherSearchQuery,
    WeatherSearchResponseDto,
};
use crate::features::weather::services::WeatherService;
use crate::shared::types::ErrorBody;

/// Current weather for a region
///
/// Falls back to a direct upstream fetch when the regular resolution fails.
#[utoipa::path(
    get,
    path = "/api/v1/weather/current/{regionCode}",
    params(
        ("regionCode" = String, Path, description = "Village code, e.g. 33.74.10.1002")
    ),
    responses(
        (status = 200, description = "Newest forecast point", body = CurrentWeatherResponseDto),
        (status = 400, description = "Malformed region code", body = ErrorBody),
        (status = 404, description = "Upstream returned no usable records", body = ErrorBody),
        (status = 502, description = "Upstream unavailable", body = ErrorBody)
    ),
    tag = "weather"
)]
pub async fn get_current_weather(
    State(service): State<Arc<WeatherService>>,
    Path(region_code): Path<String>,
) -> Result<Json<CurrentWeatherResponseDto>> {
    let code = RegionCode::parse(&region_code)?;

    let response = match service.resolve_current_weather(&code).await {
        Ok(weather) => CurrentWeatherResponseDto {
            region_code: code.to_string(),
            region: weather.region.map(RegionSummaryDto::from),
            current: weather.current,
        },
        Err(e) => {
            tracing::warn!(
                "Weather resolution for {} failed, fetching directly: {:?}",
                code,
                e
            );
            let current = service.fetch_current_direct(&code).await?;
            CurrentWeatherResponseDto {
                region_code: code.to_string(),
                region: None,
                current,
            }
        }
    };

    Ok(Json(response))
}

/// Forecast window for a region
#[utoipa::path(
    get,
    path = "/api/v1/weather/forecast/{regionCode}",
    params(
        ("regionCode" = String, Path, description = "Village code, e.g. 33.74.10.1002")
    ),
    responses(
        (status = 200, description = "Forecast points, newest first", body = ForecastResponseDto),
        (status = 400, description = "Malformed region code", body = ErrorBody),
        (status = 502, description = "Upstream unavailable", body = ErrorBody)
    ),
    tag = "weather"
)]
pub async fn get_forecast(
    State(service): State<Arc<WeatherService>>,
    Path(region_code): Path<String>,
) -> Result<Json<ForecastResponseDto>> {
    let code = RegionCode::parse(&region_code)?;
    let forecast = service.resolve_forecast(&code).await?;
    Ok(Json(ForecastResponseDto {
        region_code: code.to_string(),
        forecast,
    }))
}

/// Find regions to show weather for
#[utoipa::path(
    get,
    path = "/api/v1/weather/search",
    params(WeatherSearchQuery),
    responses(
        (status = 200, description = "Matching regions; empty for a blank query", body = WeatherSearchResponseDto),
        (status = 500, description = "Region store unavailable", body = ErrorBody)
    ),
    tag = "weather"
)]
pub async fn search_regions(
    State(service): State<Arc<WeatherService>>,
    Query(query): Query<WeatherSearchQuery>,
) -> Result<Json<WeatherSearchResponseDto>> {
    let query = query.q.unwrap_or_default();
    let results = service.search_regions(&query).await?;
    Ok(Json(WeatherSearchResponseDto { query, results }))
}

/// Refresh cached upstream data for a region
#[utoipa::path(
    post,
    path = "/api/v1/weather/sync/{regionCode}",
    params(
        ("regionCode" = String, Path, description = "Village code, e.g. 33.74.10.1002")
    ),
    responses(
        (status = 200, description = "Sync attempted; `refreshed` reports the outcome", body = SyncResponseDto),
        (status = 400, description = "Malformed region code", body = ErrorBody)
    ),
    tag = "weather"
)]
pub async fn sync_weather(
    State(service): State<Arc<WeatherService>>,
    Path(region_code): Path<String>,
) -> Result<Json<SyncResponseDto>> {
    let code = RegionCode::parse(&region_code)?;

    let response = match service.sync_region(code.as_str()).await {
        Ok(records) => SyncResponseDto {
            message: "Weather data synced successfully".to_string(),
            region_code: code.to_string(),
            refreshed: true,
            records,
        },
        Err(e) => {
            tracing::warn!("Manual weather sync for {} failed: {:?}", code, e);
            SyncResponseDto {
                message: "Weather sync failed; cached data left unchanged".to_string(),
                region_code: code.to_string(),
                refreshed: false,
                records: 0,
            }
        }
    };

    Ok(Json(response))
}
