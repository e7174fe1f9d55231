use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::incidents::models::IncidentType;
use crate::features::notifications::models::Notification;
use crate::shared::types::PaginationQuery;

/// Notification type recorded for incident fan-out
const TYPE_NEW_INCIDENT: &str = "new_incident";

/// Creates and lists in-app notifications. Delivery channels (email, push)
/// are outside this service.
pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Notify every user who follows the incident's city with notifications
    /// enabled, excluding the reporter. One INSERT..SELECT, so the fan-out is
    /// a single statement regardless of audience size.
    pub async fn fan_out_new_incident(
        &self,
        incident_id: Uuid,
        incident_type: IncidentType,
        city: &str,
        reporter_id: Option<Uuid>,
    ) -> Result<u64> {
        let title = format!("Nouvel incident à {}", city);
        let message = format!(
            "Un incident de type \"{}\" a été signalé à {}.",
            incident_type.label(),
            city
        );

        let result = sqlx::query(
            r#"
            INSERT INTO notifications (user_id, notification_type, title, message, incident_id)
            SELECT fc.user_id, $1, $2, $3, $4
            FROM favorite_cities fc
            WHERE fc.city = $5
              AND fc.notifications_enabled = TRUE
              AND ($6::uuid IS NULL OR fc.user_id <> $6)
            "#,
        )
        .bind(TYPE_NEW_INCIDENT)
        .bind(&title)
        .bind(&message)
        .bind(incident_id)
        .bind(city)
        .bind(reporter_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Notification fan-out failed: {:?}", e);
            AppError::Database(e)
        })?;

        let notified = result.rows_affected();
        tracing::debug!(
            "Fanned out incident {} to {} follower(s) of {}",
            incident_id,
            notified,
            city
        );

        Ok(notified)
    }

    /// List a user's notifications, newest first, with the unread count.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<Notification>, i64, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count notifications: {:?}", e);
                    AppError::Database(e)
                })?;

        let unread: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count unread notifications: {:?}", e);
            AppError::Database(e)
        })?;

        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, notification_type, title, message, incident_id, is_read, created_at
            FROM notifications
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
            tracing::error!("Failed to list notifications: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((notifications, total, unread))
    }

    /// Mark one of the user's notifications as read.
    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark notification read: {:?}", e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notification introuvable".to_string()));
        }

        Ok(())
    }
}
