use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::notifications::handlers;
use crate::features::notifications::services::NotificationService;

/// Create routes for the notifications feature (requires auth middleware
/// applied by the caller)
pub fn routes(service: Arc<NotificationService>) -> Router {
    Router::new()
        .route("/api/notifications", get(handlers::list_notifications))
        .route(
            "/api/notifications/{id}/read",
            patch(handlers::mark_notification_read),
        )
        .with_state(service)
}
