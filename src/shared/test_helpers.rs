#[cfg(test)]
use crate::features::auth::models::AuthenticatedUser;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
pub fn create_test_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: uuid::Uuid::new_v4(),
        first_name: "Aminatou".to_string(),
        last_name: "Ndongo".to_string(),
        email: "aminatou@example.cm".to_string(),
        role: "citizen".to_string(),
        home_city: Some("Douala".to_string()),
        email_verified: true,
    }
}

#[cfg(test)]
async fn inject_test_user_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_test_user());
    next.run(request).await
}

#[cfg(test)]
#[allow(dead_code)]
pub fn with_test_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_test_user_middleware))
}
