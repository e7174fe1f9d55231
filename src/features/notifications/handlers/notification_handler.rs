use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::models::AuthenticatedUser;
use crate::features::notifications::dtos::{NotificationDto, NotificationListDto};
use crate::features::notifications::services::NotificationService;
use crate::shared::types::{ApiResponse, PaginationMeta, PaginationQuery};

/// List the authenticated user's notifications
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Notifications", body = ApiResponse<NotificationListDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn list_notifications(
    user: AuthenticatedUser,
    State(service): State<Arc<NotificationService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<NotificationListDto>>> {
    let (notifications, total, unread) = service.list_for_user(user.id, &pagination).await?;

    let dto = NotificationListDto {
        notifications: notifications.into_iter().map(NotificationDto::from).collect(),
        unread_count: unread,
    };
    let meta = PaginationMeta::new(pagination.limit(), pagination.offset(), total);

    Ok(Json(ApiResponse::success(Some(dto), None, Some(meta))))
}

/// Mark a notification as read
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn mark_notification_read(
    user: AuthenticatedUser,
    State(service): State<Arc<NotificationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.mark_read(user.id, id).await?;

    Ok(Json(ApiResponse::success(
        None,
        Some("Notification marquée comme lue".to_string()),
        None,
    )))
}
