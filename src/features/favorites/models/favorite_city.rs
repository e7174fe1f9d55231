use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a followed city
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct FavoriteCity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub city: String,
    pub notifications_enabled: bool,
    pub created_at: DateTime<Utc>,
}
