use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::notifications::models::Notification;

/// Response DTO for a notification
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationDto {
    pub id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub incident_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationDto {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            notification_type: n.notification_type,
            title: n.title,
            message: n.message,
            incident_id: n.incident_id,
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }
}

/// Response DTO for the notification listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationListDto {
    pub notifications: Vec<NotificationDto>,
    pub unread_count: i64,
}
