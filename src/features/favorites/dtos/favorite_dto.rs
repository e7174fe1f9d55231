use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::favorites::models::FavoriteCity;

/// Request DTO for following a city
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddFavoriteCityDto {
    #[validate(length(min = 1, max = 100, message = "doit contenir entre 1 et 100 caractères"))]
    pub city: String,
}

/// Response DTO for a followed city
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FavoriteCityDto {
    pub id: Uuid,
    pub city: String,
    pub notifications_enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<FavoriteCity> for FavoriteCityDto {
    fn from(f: FavoriteCity) -> Self {
        Self {
            id: f.id,
            city: f.city,
            notifications_enabled: f.notifications_enabled,
            created_at: f.created_at,
        }
    }
}

/// Response DTO after toggling notifications for a city
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ToggleNotificationsResponseDto {
    pub city: String,
    pub notifications_enabled: bool,
}
