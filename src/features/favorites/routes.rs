use std::sync::Arc;

use axum::{
    routing::{delete, get, patch},
    Router,
};

use crate::features::favorites::handlers;
use crate::features::favorites::services::FavoriteService;

/// Create routes for the favorites feature (requires auth middleware applied
/// by the caller)
pub fn routes(service: Arc<FavoriteService>) -> Router {
    Router::new()
        .route(
            "/api/favorites",
            get(handlers::list_favorites).post(handlers::add_favorite),
        )
        .route("/api/favorites/{city}", delete(handlers::remove_favorite))
        .route(
            "/api/favorites/{city}/notifications",
            patch(handlers::toggle_notifications),
        )
        .with_state(service)
}
