use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::stats::handlers;
use crate::features::stats::services::StatsService;

/// Create routes for the stats feature (public)
pub fn routes(service: Arc<StatsService>) -> Router {
    Router::new()
        .route("/api/stats", get(handlers::get_stats))
        .with_state(service)
}
