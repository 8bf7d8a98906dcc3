use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Json,
};

use crate::core::error::Result;
use crate::features::regions::dtos::{
    ProvinceResponseDto, RegencyResponseDto, RegionSearchQuery, RegionSummaryDto,
    VillageListQuery, VillageResponseDto,
};
use crate::features::regions::services::RegionService;
use crate::shared::types::{ErrorBody, ListResponse, PaginatedResponse};

const X_CACHE: &str = "x-cache";

/// List all provinces
#[utoipa::path(
    get,
    path = "/api/v1/regions/provinces",
    responses(
        (status = 200, description = "Provinces sorted by name; X-Cache reports HIT or MISS", body = ListResponse<ProvinceResponseDto>),
        (status = 500, description = "Region store unavailable", body = ErrorBody)
    ),
    tag = "regions"
)]
pub async fn list_provinces(State(service): State<Arc<RegionService>>) -> Result<Response> {
    let cached = service.list_provinces().await?;
    let cache_status = if cached.cache_hit { "HIT" } else { "MISS" };

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (HeaderName::from_static(X_CACHE), cache_status),
        ],
        cached.body,
    )
        .into_response())
}

/// List regencies in a province
#[utoipa::path(
    get,
    path = "/api/v1/regions/regencies/{provinceCode}",
    params(
        ("provinceCode" = String, Path, description = "Province code, e.g. 33")
    ),
    responses(
        (status = 200, description = "Regencies sorted by name", body = ListResponse<RegencyResponseDto>),
        (status = 500, description = "Region store unavailable", body = ErrorBody)
    ),
    tag = "regions"
)]
pub async fn list_regencies(
    State(service): State<Arc<RegionService>>,
    Path(province_code): Path<String>,
) -> Result<Json<ListResponse<RegencyResponseDto>>> {
    let regencies = service.list_regencies(&province_code).await?;
    Ok(Json(regencies))
}

/// List villages with weather data in a regency
#[utoipa::path(
    get,
    path = "/api/v1/regions/villages/{regencyCode}",
    params(
        ("regencyCode" = String, Path, description = "Regency code, e.g. 33.74"),
        VillageListQuery
    ),
    responses(
        (status = 200, description = "Page of villages sorted by name", body = PaginatedResponse<VillageResponseDto>),
        (status = 500, description = "Region store unavailable", body = ErrorBody)
    ),
    tag = "regions"
)]
pub async fn list_villages(
    State(service): State<Arc<RegionService>>,
    Path(regency_code): Path<String>,
    Query(query): Query<VillageListQuery>,
) -> Result<Json<PaginatedResponse<VillageResponseDto>>> {
    let villages = service
        .list_villages(&regency_code, query.page_request())
        .await?;
    Ok(Json(villages))
}

/// Search regions by name across all levels
#[utoipa::path(
    get,
    path = "/api/v1/regions/search",
    params(RegionSearchQuery),
    responses(
        (status = 200, description = "Matches with hierarchical display names", body = ListResponse<RegionSummaryDto>),
        (status = 400, description = "Query parameter 'q' is missing", body = ErrorBody),
        (status = 500, description = "Region store unavailable", body = ErrorBody)
    ),
    tag = "regions"
)]
pub async fn search_regions(
    State(service): State<Arc<RegionService>>,
    Query(query): Query<RegionSearchQuery>,
) -> Result<Json<ListResponse<RegionSummaryDto>>> {
    let results = service
        .search(query.query(), query.level_filter(), query.limit())
        .await?;
    Ok(Json(results))
}
