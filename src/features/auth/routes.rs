use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;

/// Public auth routes (registration and login)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .with_state(service)
}

/// Protected auth routes (requires auth middleware applied by the caller)
pub fn protected_routes() -> Router {
    Router::new().route("/api/auth/me", get(handlers::me))
}
