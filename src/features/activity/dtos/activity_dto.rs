use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::activity::models::ActivityLog;

/// Response DTO for an activity-log entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityLogDto {
    pub id: Uuid,
    pub action: String,
    #[schema(value_type = Object)]
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityLog> for ActivityLogDto {
    fn from(entry: ActivityLog) -> Self {
        Self {
            id: entry.id,
            action: entry.action,
            details: entry
                .details
                .as_deref()
                .and_then(|d| serde_json::from_str(d).ok()),
            created_at: entry.created_at,
        }
    }
}
