use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{UpdateProfileDto, UserProfileResponseDto};
use crate::features::users::services::UserService;
use crate::shared::types::ErrorBody;
use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/api/v1/users/profile",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = UserProfileResponseDto),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
) -> Result<Json<UserProfileResponseDto>> {
    let profile = service.get_or_create_profile(&user).await?;
    Ok(Json(profile.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated successfully", body = UserProfileResponseDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<UpdateProfileDto>,
) -> Result<Json<UserProfileResponseDto>> {
    let dto = dto.normalized();
    dto.validate()?;

    let profile = service.update_profile(&user, dto).await?;
    Ok(Json(profile.into()))
}
