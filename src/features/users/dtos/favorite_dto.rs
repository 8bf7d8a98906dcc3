use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::regions::dtos::RegionSummaryDto;
use crate::features::users::models::FavoriteRegion;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteDto {
    #[validate(regex(
        path = "*crate::shared::validation::REGION_CODE_REGEX",
        message = "Region code must be 1-4 dot-separated numeric segments"
    ))]
    pub region_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponseDto {
    pub region_code: String,
    pub sort_order: i32,
    pub added_at: DateTime<Utc>,
    pub region: RegionSummaryDto,
}

impl From<FavoriteRegion> for FavoriteResponseDto {
    fn from(favorite: FavoriteRegion) -> Self {
        Self {
            region_code: favorite.region.code.clone(),
            sort_order: favorite.sort_order,
            added_at: favorite.added_at,
            region: favorite.region.into(),
        }
    }
}
