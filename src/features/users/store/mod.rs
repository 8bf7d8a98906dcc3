//! Persistence for profiles and favourites.
//!
//! Favourites reference regions by code; listings only ever include regions
//! that are still active.

mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::models::{FavoriteRegion, User};

pub use postgres::PgUserStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Row for the token subject, inserted from the claims when absent
    async fn get_or_create(&self, user: &AuthenticatedUser) -> Result<User>;

    /// Overwrites the given fields; `None` leaves a field unchanged
    async fn update(&self, id: Uuid, name: Option<&str>, email: Option<&str>) -> Result<User>;

    /// Favourites on active regions ordered by `sort_order`
    async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<FavoriteRegion>>;

    /// Appends after the highest `sort_order`; `Conflict` when already present
    async fn insert_favorite(
        &self,
        user_id: Uuid,
        region_code: &str,
    ) -> Result<(i32, DateTime<Utc>)>;

    /// Whether a row was removed
    async fn delete_favorite(&self, user_id: Uuid, region_code: &str) -> Result<bool>;
}
