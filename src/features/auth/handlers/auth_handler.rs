use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthUserDto, LoginRequestDto, LoginResponseDto, RegisterRequestDto, RegisterResponseDto,
};
use crate::features::auth::models::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::{ApiResponse, RequestMeta};

/// Register a new citizen account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 200, description = "Account created", body = ApiResponse<RegisterResponseDto>),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<Json<ApiResponse<RegisterResponseDto>>> {
    let meta = RequestMeta::from_headers(&headers);
    let user_id = service.register(dto, &meta).await?;

    Ok(Json(ApiResponse::success(
        Some(RegisterResponseDto { user_id }),
        Some("Compte créé avec succès. Un email de vérification vous a été envoyé.".to_string()),
        None,
    )))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponseDto>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account deactivated")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    let meta = RequestMeta::from_headers(&headers);
    let (token, user) = service.login(dto, &meta).await?;

    let response = LoginResponseDto {
        token,
        expires_in: service.token_ttl_secs(),
        user: AuthUserDto::from(&user),
    };

    Ok(Json(ApiResponse::success(
        Some(response),
        Some("Connexion réussie".to_string()),
        None,
    )))
}

/// Return the authenticated user's profile; doubles as token verification
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Authenticated user", body = ApiResponse<AuthenticatedUser>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(user: AuthenticatedUser) -> Result<Json<ApiResponse<AuthenticatedUser>>> {
    Ok(Json(ApiResponse::success(Some(user), None, None)))
}
