use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::favorites::models::FavoriteCity;

/// Manages the cities a user follows for incident notifications
pub struct FavoriteService {
    pool: PgPool,
}

impl FavoriteService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a user's favorite cities, alphabetically.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<FavoriteCity>> {
        sqlx::query_as::<_, FavoriteCity>(
            r#"
            SELECT id, user_id, city, notifications_enabled, created_at
            FROM favorite_cities
            WHERE user_id = $1
            ORDER BY city
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list favorite cities: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Follow a city. Adding the same city twice is a no-op and returns the
    /// existing row.
    pub async fn add(&self, user_id: Uuid, city: &str) -> Result<FavoriteCity> {
        let city = city.trim();
        if city.is_empty() {
            return Err(AppError::Validation(vec!["city: est requise".to_string()]));
        }

        sqlx::query(
            r#"
            INSERT INTO favorite_cities (user_id, city)
            VALUES ($1, $2)
            ON CONFLICT (user_id, city) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(city)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to add favorite city: {:?}", e);
            AppError::Database(e)
        })?;

        sqlx::query_as::<_, FavoriteCity>(
            r#"
            SELECT id, user_id, city, notifications_enabled, created_at
            FROM favorite_cities
            WHERE user_id = $1 AND city = $2
            "#,
        )
        .bind(user_id)
        .bind(city)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch favorite city: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Stop following a city.
    pub async fn remove(&self, user_id: Uuid, city: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM favorite_cities WHERE user_id = $1 AND city = $2")
            .bind(user_id)
            .bind(city)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to remove favorite city: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Ville favorite introuvable".to_string()));
        }

        Ok(())
    }

    /// Flip the notification flag for a followed city and return the new state.
    pub async fn toggle_notifications(&self, user_id: Uuid, city: &str) -> Result<bool> {
        let enabled: Option<bool> = sqlx::query_scalar(
            r#"
            UPDATE favorite_cities
            SET notifications_enabled = NOT notifications_enabled
            WHERE user_id = $1 AND city = $2
            RETURNING notifications_enabled
            "#,
        )
        .bind(user_id)
        .bind(city)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to toggle favorite notifications: {:?}", e);
            AppError::Database(e)
        })?;

        enabled.ok_or_else(|| AppError::NotFound("Ville favorite introuvable".to_string()))
    }
}
