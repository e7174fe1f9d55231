use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::incidents::handlers;
use crate::features::incidents::services::IncidentService;

/// Create routes for the incidents feature
///
/// Listing is public; submission accepts an optional bearer identity, so the
/// caller applies the optional-auth middleware to this router.
pub fn routes(service: Arc<IncidentService>) -> Router {
    Router::new()
        .route(
            "/api/incidents",
            get(handlers::list_incidents).post(handlers::submit_incident),
        )
        .with_state(service)
}
