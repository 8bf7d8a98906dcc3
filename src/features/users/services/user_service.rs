use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::regions::models::RegionCode;
use crate::features::regions::store::RegionStore;
use crate::features::users::dtos::{FavoriteResponseDto, UpdateProfileDto};
use crate::features::users::models::{FavoriteRegion, User};
use crate::features::users::store::UserStore;

/// Service for user profiles and favourite regions
pub struct UserService {
    users: Arc<dyn UserStore>,
    regions: Arc<dyn RegionStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, regions: Arc<dyn RegionStore>) -> Self {
        Self { users, regions }
    }

    // ==================== Profile Methods ====================

    /// Profile for the token subject, created from the token claims on first access
    pub async fn get_or_create_profile(&self, user: &AuthenticatedUser) -> Result<User> {
        self.users.get_or_create(user).await
    }

    /// Expects a DTO that has already been normalized and validated
    pub async fn update_profile(
        &self,
        user: &AuthenticatedUser,
        dto: UpdateProfileDto,
    ) -> Result<User> {
        let profile = self.get_or_create_profile(user).await?;
        let updated = self
            .users
            .update(profile.id, dto.name.as_deref(), dto.email.as_deref())
            .await?;

        tracing::info!("Updated profile {}", updated.id);
        Ok(updated)
    }

    // ==================== Favorite Methods ====================

    pub async fn list_favorites(&self, user: &AuthenticatedUser) -> Result<Vec<FavoriteResponseDto>> {
        let profile = self.get_or_create_profile(user).await?;
        let favorites = self.users.list_favorites(profile.id).await?;
        Ok(favorites.into_iter().map(Into::into).collect())
    }

    /// Appends an active region to the end of the user's favourites
    pub async fn add_favorite(
        &self,
        user: &AuthenticatedUser,
        region_code: &str,
    ) -> Result<FavoriteResponseDto> {
        let code = RegionCode::parse(region_code)?;
        let region = self
            .regions
            .find_by_code(code.as_str())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Region '{}' not found", code)))?;

        let profile = self.get_or_create_profile(user).await?;
        let (sort_order, added_at) = self
            .users
            .insert_favorite(profile.id, code.as_str())
            .await?;

        tracing::info!("User {} added favorite {}", profile.id, code);

        Ok(FavoriteRegion {
            sort_order,
            added_at,
            region,
        }
        .into())
    }

    pub async fn remove_favorite(&self, user: &AuthenticatedUser, region_code: &str) -> Result<()> {
        let profile = self.get_or_create_profile(user).await?;
        let region_code = region_code.trim();

        if !self.users.delete_favorite(profile.id, region_code).await? {
            return Err(AppError::NotFound(format!(
                "Region '{}' is not a favorite",
                region_code
            )));
        }

        tracing::info!("User {} removed favorite {}", profile.id, region_code);
        Ok(())
    }
}
