use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::activity::models::ActivityLog;
use crate::shared::types::PaginationQuery;

/// Records and lists per-user activity entries (registrations, logins,
/// incident submissions).
pub struct ActivityLogService {
    pool: PgPool,
}

impl ActivityLogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an entry for the given user.
    pub async fn record(
        &self,
        user_id: Uuid,
        action: &str,
        details: Option<serde_json::Value>,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<()> {
        let details = details.as_ref().map(|d| d.to_string());

        sqlx::query(
            r#"
            INSERT INTO activity_logs (user_id, action, details, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(action)
        .bind(details)
        .bind(ip_address)
        .bind(user_agent)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record activity '{}': {:?}", action, e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    /// List entries for a user, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ActivityLog>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM activity_logs WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count activity entries: {:?}", e);
                    AppError::Database(e)
                })?;

        let entries = sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT id, user_id, action, details, ip_address, user_agent, created_at
            FROM activity_logs
            WHERE user_id = $1
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(pagination.offset())
        .bind(pagination.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list activity entries: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((entries, total))
    }
}
