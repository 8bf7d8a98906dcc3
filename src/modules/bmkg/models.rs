use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Timestamp layout used by every BMKG datetime field
pub const BMKG_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Response body of `GET /prakiraan-cuaca?adm4={code}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmkgWeatherResponse {
    pub data: Vec<BmkgWeatherRecord>,
}

/// `null` decodes like an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One forecast point, newest first in the upstream ordering.
///
/// Fields are lenient: a missing or `null` value decodes to its zero value
/// so a single malformed record cannot fail the whole response. Records whose
/// timestamps end up empty are dropped later, when readings are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmkgWeatherRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub utc_datetime: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub local_datetime: String,
    /// Temperature in °C
    #[serde(rename = "t", default, deserialize_with = "null_as_default")]
    pub temperature: f64,
    /// Relative humidity in percent
    #[serde(rename = "hu", default, deserialize_with = "null_as_default")]
    pub humidity: i32,
    /// Description in Bahasa Indonesia
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather_desc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather_desc_en: String,
    #[serde(rename = "ws", default, deserialize_with = "null_as_default")]
    pub wind_speed: f64,
    #[serde(rename = "wd", default, deserialize_with = "null_as_default")]
    pub wind_direction: String,
    /// Total cloud cover in percent
    #[serde(rename = "tcc", default, deserialize_with = "null_as_default")]
    pub cloud_cover: i32,
    #[serde(rename = "vs_text", default, deserialize_with = "null_as_default")]
    pub visibility: String,
    #[serde(default)]
    pub analysis_date: Option<String>,
}

impl BmkgWeatherRecord {
    pub fn utc_time(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(self.utc_datetime.trim(), BMKG_DATETIME_FORMAT)
            .ok()
            .map(|dt| dt.and_utc())
    }

    /// Wall-clock time at the region; BMKG does not send an offset
    pub fn local_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.local_datetime.trim(), BMKG_DATETIME_FORMAT).ok()
    }
}
