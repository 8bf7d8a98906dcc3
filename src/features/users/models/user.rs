use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::regions::models::Region;

/// Local profile keyed by the token subject
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Favourite joined with its region row
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteRegion {
    pub sort_order: i32,
    pub added_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub region: Region,
}
