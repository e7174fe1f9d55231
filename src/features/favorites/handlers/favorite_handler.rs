use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::models::AuthenticatedUser;
use crate::features::favorites::dtos::{
    AddFavoriteCityDto, FavoriteCityDto, ToggleNotificationsResponseDto,
};
use crate::features::favorites::services::FavoriteService;
use crate::shared::types::ApiResponse;
use crate::shared::validation::collect_field_errors;

/// List the authenticated user's favorite cities
#[utoipa::path(
    get,
    path = "/api/favorites",
    responses(
        (status = 200, description = "Favorite cities", body = ApiResponse<Vec<FavoriteCityDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "favorites"
)]
pub async fn list_favorites(
    user: AuthenticatedUser,
    State(service): State<Arc<FavoriteService>>,
) -> Result<Json<ApiResponse<Vec<FavoriteCityDto>>>> {
    let favorites = service.list(user.id).await?;
    let dtos: Vec<FavoriteCityDto> = favorites.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Follow a city for incident notifications
#[utoipa::path(
    post,
    path = "/api/favorites",
    request_body = AddFavoriteCityDto,
    responses(
        (status = 200, description = "City followed", body = ApiResponse<FavoriteCityDto>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "favorites"
)]
pub async fn add_favorite(
    user: AuthenticatedUser,
    State(service): State<Arc<FavoriteService>>,
    AppJson(dto): AppJson<AddFavoriteCityDto>,
) -> Result<Json<ApiResponse<FavoriteCityDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(collect_field_errors(&e)))?;

    let favorite = service.add(user.id, &dto.city).await?;

    Ok(Json(ApiResponse::success(
        Some(favorite.into()),
        Some("Ville ajoutée aux favoris".to_string()),
        None,
    )))
}

/// Stop following a city
#[utoipa::path(
    delete,
    path = "/api/favorites/{city}",
    params(
        ("city" = String, Path, description = "City name")
    ),
    responses(
        (status = 200, description = "City removed from favorites"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "City not in favorites")
    ),
    security(("bearer_auth" = [])),
    tag = "favorites"
)]
pub async fn remove_favorite(
    user: AuthenticatedUser,
    State(service): State<Arc<FavoriteService>>,
    Path(city): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    service.remove(user.id, &city).await?;

    Ok(Json(ApiResponse::success(
        None,
        Some("Ville retirée des favoris".to_string()),
        None,
    )))
}

/// Toggle notifications for a followed city
#[utoipa::path(
    patch,
    path = "/api/favorites/{city}/notifications",
    params(
        ("city" = String, Path, description = "City name")
    ),
    responses(
        (status = 200, description = "Notification flag toggled", body = ApiResponse<ToggleNotificationsResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "City not in favorites")
    ),
    security(("bearer_auth" = [])),
    tag = "favorites"
)]
pub async fn toggle_notifications(
    user: AuthenticatedUser,
    State(service): State<Arc<FavoriteService>>,
    Path(city): Path<String>,
) -> Result<Json<ApiResponse<ToggleNotificationsResponseDto>>> {
    let enabled = service.toggle_notifications(user.id, &city).await?;

    Ok(Json(ApiResponse::success(
        Some(ToggleNotificationsResponseDto {
            city,
            notifications_enabled: enabled,
        }),
        None,
        None,
    )))
}
