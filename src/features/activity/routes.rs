use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::activity::handlers;
use crate::features::activity::services::ActivityLogService;

/// Create routes for the activity feature (requires auth middleware applied
/// by the caller)
pub fn routes(service: Arc<ActivityLogService>) -> Router {
    Router::new()
        .route("/api/activity", get(handlers::list_activity))
        .with_state(service)
}
