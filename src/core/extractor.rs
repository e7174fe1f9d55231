use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::core::middleware::MaybeUser;
use crate::features::auth::models::AuthenticatedUser;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Auth("Authentification requise".to_string()))
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<MaybeUser>().cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_test_user, with_test_auth};
    use axum::http::StatusCode;
    use axum::{routing::get, routing::post, Router};
    use axum_test::TestServer;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct EchoDto {
        message: String,
    }

    async fn echo(AppJson(dto): AppJson<EchoDto>) -> String {
        dto.message
    }

    async fn whoami(user: AuthenticatedUser) -> String {
        user.email
    }

    async fn maybe_whoami(MaybeUser(user): MaybeUser) -> String {
        match user {
            Some(user) => user.email,
            None => "anonyme".to_string(),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let app = Router::new().route("/echo", post(echo));
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/echo")
            .content_type("application/json")
            .text("ceci n'est pas du JSON")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn valid_json_reaches_the_handler() {
        let app = Router::new().route("/echo", post(echo));
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/echo")
            .json(&serde_json::json!({"message": "bonjour"}))
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), "bonjour");
    }

    #[tokio::test]
    async fn authenticated_user_extractor_requires_the_middleware() {
        let app = Router::new().route("/whoami", get(whoami));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/whoami").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn authenticated_user_extractor_reads_the_injected_identity() {
        let app = with_test_auth(Router::new().route("/whoami", get(whoami)));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/whoami").await;
        response.assert_status_ok();
        assert_eq!(response.text(), create_test_user().email);
    }

    #[tokio::test]
    async fn maybe_user_defaults_to_anonymous() {
        let app = Router::new().route("/whoami", get(maybe_whoami));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/whoami").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "anonyme");
    }
}
