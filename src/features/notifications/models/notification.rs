use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a notification
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub incident_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
