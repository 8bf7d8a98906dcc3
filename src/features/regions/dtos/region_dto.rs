use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::regions::models::Region;
use crate::shared::types::{parse_limit, PageRequest};

/// Query parameters for paginated village listings.
///
/// Kept as raw strings so malformed values fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct VillageListQuery {
    /// Page number (1-indexed, default: 1)
    #[param(example = "1")]
    pub page: Option<String>,
    /// Items per page (1-50, default: 20)
    #[param(example = "20")]
    pub limit: Option<String>,
}

/// Query parameters for hierarchical region search
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct RegionSearchQuery {
    /// Search text (case-insensitive, partial match on name)
    #[param(example = "malang")]
    pub q: Option<String>,
    /// Restrict to one level: 1 province, 2 regency, 3 district, 4 village
    #[param(example = "2")]
    pub level: Option<String>,
    /// Maximum results (1-50, default: 20)
    pub limit: Option<String>,
}

impl VillageListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

impl RegionSearchQuery {
    pub fn query(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }

    /// Level filter; a value that is not a number is ignored
    pub fn level_filter(&self) -> Option<i32> {
        self.level
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .and_then(|l| l.parse().ok())
    }

    pub fn limit(&self) -> i64 {
        parse_limit(self.limit.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceResponseDto {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub level: i32,
}

impl From<Region> for ProvinceResponseDto {
    fn from(region: Region) -> Self {
        Self {
            id: region.id,
            code: region.code,
            name: region.name,
            level: region.level,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegencyResponseDto {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub level: i32,
    pub province_code: String,
}

impl RegencyResponseDto {
    pub fn from_region(region: Region, province_code: &str) -> Self {
        Self {
            id: region.id,
            code: region.code,
            name: region.name,
            level: region.level,
            province_code: province_code.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VillageResponseDto {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub level: i32,
    pub regency_code: String,
    pub has_weather_data: bool,
}

impl VillageResponseDto {
    pub fn from_region(region: Region, regency_code: &str) -> Self {
        Self {
            id: region.id,
            code: region.code,
            name: region.name,
            level: region.level,
            regency_code: regency_code.to_string(),
            has_weather_data: region.has_weather_data,
        }
    }
}

/// Search hit with its full hierarchical label.
///
/// Unknown ancestor names are rendered as empty strings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummaryDto {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub level: i32,
    pub province_name: String,
    pub regency_name: String,
    pub district_name: String,
    pub village_name: String,
    /// e.g. "Sendangmulyo, Kec. Tembalang, Kota Semarang, Jawa Tengah"
    pub display_name: String,
    pub has_weather_data: bool,
}

impl From<Region> for RegionSummaryDto {
    fn from(region: Region) -> Self {
        let display_name = region.display_name();
        Self {
            id: region.id,
            code: region.code,
            name: region.name,
            level: region.level,
            province_name: region.province_name.unwrap_or_default(),
            regency_name: region.regency_name.unwrap_or_default(),
            district_name: region.district_name.unwrap_or_default(),
            village_name: region.village_name.unwrap_or_default(),
            display_name,
            has_weather_data: region.has_weather_data,
        }
    }
}
