use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::stats::dtos::StatsDto;
use crate::features::stats::services::StatsService;
use crate::shared::types::ApiResponse;

/// Aggregate statistics for the public dashboard
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Aggregate statistics", body = ApiResponse<StatsDto>)
    ),
    tag = "stats"
)]
pub async fn get_stats(
    State(service): State<Arc<StatsService>>,
) -> Result<Json<ApiResponse<StatsDto>>> {
    let stats = service.get_stats().await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}
