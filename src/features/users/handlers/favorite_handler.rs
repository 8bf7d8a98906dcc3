use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{AddFavoriteDto, FavoriteResponseDto};
use crate::features::users::services::UserService;
use crate::shared::types::{ErrorBody, ListResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/api/v1/users/favorites",
    responses(
        (status = 200, description = "Favourite regions in the user's order", body = ListResponse<FavoriteResponseDto>),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_favorites(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ListResponse<FavoriteResponseDto>>> {
    let favorites = service.list_favorites(&user).await?;
    Ok(Json(ListResponse::new(favorites)))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/favorites",
    request_body = AddFavoriteDto,
    responses(
        (status = 201, description = "Favourite added", body = FavoriteResponseDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Region not found", body = ErrorBody),
        (status = 409, description = "Region already a favourite", body = ErrorBody)
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_favorite(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<AddFavoriteDto>,
) -> Result<(StatusCode, Json<FavoriteResponseDto>)> {
    dto.validate()?;

    let favorite = service.add_favorite(&user, &dto.region_code).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/favorites/{regionCode}",
    params(
        ("regionCode" = String, Path, description = "Region code to remove")
    ),
    responses(
        (status = 204, description = "Favourite removed"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Region is not a favourite", body = ErrorBody)
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_favorite(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    Path(region_code): Path<String>,
) -> Result<StatusCode> {
    service.remove_favorite(&user, &region_code).await?;
    Ok(StatusCode::NO_CONTENT)
}
