use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::regions::models::Region;
use crate::modules::bmkg::BmkgWeatherRecord;

/// One forecast point in API shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    /// °C
    pub temperature: f64,
    /// Relative humidity, percent
    pub humidity: i32,
    pub weather_desc: String,
    pub weather_desc_en: String,
    pub wind_speed: f64,
    pub wind_direction: String,
    /// Percent
    pub cloud_cover: i32,
    pub visibility: String,
    pub datetime: DateTime<Utc>,
    /// Wall-clock time at the region
    pub local_datetime: NaiveDateTime,
}

impl WeatherReading {
    /// `None` when either timestamp does not parse
    pub fn from_record(record: &BmkgWeatherRecord) -> Option<Self> {
        Some(Self {
            temperature: record.temperature,
            humidity: record.humidity,
            weather_desc: record.weather_desc.clone(),
            weather_desc_en: record.weather_desc_en.clone(),
            wind_speed: record.wind_speed,
            wind_direction: record.wind_direction.clone(),
            cloud_cover: record.cloud_cover,
            visibility: record.visibility.clone(),
            datetime: record.utc_time()?,
            local_datetime: record.local_time()?,
        })
    }
}

/// Every record with parseable timestamps, upstream order preserved
pub fn forecast_from(records: &[BmkgWeatherRecord]) -> Vec<WeatherReading> {
    records
        .iter()
        .filter_map(|record| {
            let reading = WeatherReading::from_record(record);
            if reading.is_none() {
                tracing::debug!(
                    "Skipping weather record with unparseable timestamps: {}",
                    record.utc_datetime
                );
            }
            reading
        })
        .collect()
}

/// Newest usable record; upstream sends newest first
pub fn current_from(region_code: &str, records: &[BmkgWeatherRecord]) -> Result<WeatherReading> {
    records
        .iter()
        .find_map(WeatherReading::from_record)
        .ok_or_else(|| {
            AppError::NoDataAvailable(format!("No weather data available for {}", region_code))
        })
}

/// Current conditions plus the locally known region, if any
#[derive(Debug, Clone)]
pub struct CurrentWeather {
    pub region: Option<Region>,
    pub current: WeatherReading,
}
