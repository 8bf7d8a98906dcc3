use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::models::{FavoriteRegion, User};
use crate::features::users::store::UserStore;

const USER_COLUMNS: &str = "id, subject, email, name, created_at, updated_at";

/// Postgres-backed store over `users` and `user_favorites`
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_or_create(&self, user: &AuthenticatedUser) -> Result<User> {
        sqlx::query(
            r#"
            INSERT INTO users (id, subject, email, name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (subject) DO NOTHING
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&user.subject)
        .bind(&user.email)
        .bind(&user.name)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create profile for {}: {:?}", user.subject, e);
            AppError::StoreUnavailable(e)
        })?;

        let sql = format!("SELECT {} FROM users WHERE subject = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.subject)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch profile for {}: {:?}", user.subject, e);
                AppError::StoreUnavailable(e)
            })
    }

    async fn update(&self, id: Uuid, name: Option<&str>, email: Option<&str>) -> Result<User> {
        let sql = format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(name)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update profile {}: {:?}", id, e);
                AppError::StoreUnavailable(e)
            })
    }

    async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<FavoriteRegion>> {
        sqlx::query_as::<_, FavoriteRegion>(
            r#"
            SELECT
                f.sort_order, f.created_at AS added_at,
                r.id, r.code, r.name, r.level,
                r.province_code, r.province_name,
                r.regency_code, r.regency_name,
                r.district_code, r.district_name,
                r.village_code, r.village_name,
                r.has_weather_data, r.is_active, r.created_at, r.updated_at
            FROM user_favorites f
            JOIN regions r ON r.code = f.region_code
            WHERE f.user_id = $1 AND r.is_active = TRUE
            ORDER BY f.sort_order ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch favorites for {}: {:?}", user_id, e);
            AppError::StoreUnavailable(e)
        })
    }

    async fn insert_favorite(
        &self,
        user_id: Uuid,
        region_code: &str,
    ) -> Result<(i32, DateTime<Utc>)> {
        sqlx::query_as::<_, (i32, DateTime<Utc>)>(
            r#"
            INSERT INTO user_favorites (id, user_id, region_code, sort_order)
            SELECT $1, $2, $3, COALESCE(MAX(sort_order) + 1, 0)
            FROM user_favorites
            WHERE user_id = $2
            RETURNING sort_order, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(region_code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::Conflict(format!(
                    "Region '{}' is already a favorite",
                    region_code
                ));
            }
            tracing::error!(
                "Failed to add favorite {} for {}: {:?}",
                region_code,
                user_id,
                e
            );
            AppError::StoreUnavailable(e)
        })
    }

    async fn delete_favorite(&self, user_id: Uuid, region_code: &str) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND region_code = $2")
                .bind(user_id)
                .bind(region_code)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to remove favorite {} for {}: {:?}",
                        region_code,
                        user_id,
                        e
                    );
                    AppError::StoreUnavailable(e)
                })?;

        Ok(result.rows_affected() > 0)
    }
}
