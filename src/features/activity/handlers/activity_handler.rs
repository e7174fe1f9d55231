use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::activity::dtos::ActivityLogDto;
use crate::features::activity::services::ActivityLogService;
use crate::features::auth::models::AuthenticatedUser;
use crate::shared::types::{ApiResponse, PaginationMeta, PaginationQuery};

/// List the authenticated user's activity, newest first
#[utoipa::path(
    get,
    path = "/api/activity",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Activity entries", body = ApiResponse<Vec<ActivityLogDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "activity"
)]
pub async fn list_activity(
    user: AuthenticatedUser,
    State(service): State<Arc<ActivityLogService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ActivityLogDto>>>> {
    let (entries, total) = service.list_for_user(user.id, &pagination).await?;
    let dtos: Vec<ActivityLogDto> = entries.into_iter().map(Into::into).collect();
    let meta = PaginationMeta::new(pagination.limit(), pagination.offset(), total);

    Ok(Json(ApiResponse::success(Some(dtos), None, Some(meta))))
}
