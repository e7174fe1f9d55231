use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::activity::ActivityLogService;
use crate::features::auth::dtos::{LoginRequestDto, RegisterRequestDto};
use crate::features::auth::models::{AuthenticatedUser, User};
use crate::features::auth::services::password;
use crate::features::auth::services::TokenService;
use crate::shared::types::RequestMeta;
use crate::shared::validation::collect_field_errors;

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, role, is_active, \
     phone, home_city, email_verified, verification_token, last_login_at, created_at, updated_at";

/// Service for registration, login and identity lookups
pub struct AuthService {
    pool: PgPool,
    token_service: Arc<TokenService>,
    activity: Arc<ActivityLogService>,
}

impl AuthService {
    pub fn new(
        pool: PgPool,
        token_service: Arc<TokenService>,
        activity: Arc<ActivityLogService>,
    ) -> Self {
        Self {
            pool,
            token_service,
            activity,
        }
    }

    /// Register a new account. Duplicate email is a conflict; the home city,
    /// when given, is added to the user's favorite cities right away.
    pub async fn register(&self, dto: RegisterRequestDto, meta: &RequestMeta) -> Result<Uuid> {
        dto.validate()
            .map_err(|e| AppError::Validation(collect_field_errors(&e)))?;

        let email = dto.email.trim().to_lowercase();

        let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(AppError::Conflict(
                "Cette adresse email est déjà utilisée".to_string(),
            ));
        }

        let password_hash = password::hash_password(&dto.password)?;
        let verification_token = generate_verification_token();

        let user_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, phone, home_city, verification_token)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(&email)
        .bind(&password_hash)
        .bind(dto.phone.as_deref().map(str::trim))
        .bind(dto.home_city.as_deref().map(str::trim))
        .bind(&verification_token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create user: {:?}", e);
            AppError::Database(e)
        })?;

        // The home city doubles as the first notification subscription
        if let Some(city) = dto.home_city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            sqlx::query(
                r#"
                INSERT INTO favorite_cities (user_id, city)
                VALUES ($1, $2)
                ON CONFLICT (user_id, city) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(city)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to add home city as favorite: {:?}", e);
                AppError::Database(e)
            })?;
        }

        if let Err(e) = self
            .activity
            .record(
                user_id,
                "register",
                Some(serde_json::json!({ "home_city": dto.home_city })),
                meta.ip_address.as_deref(),
                meta.user_agent.as_deref(),
            )
            .await
        {
            tracing::warn!("Failed to log registration for {}: {}", user_id, e);
        }

        tracing::info!("Registered user {} ({})", user_id, email);

        Ok(user_id)
    }

    /// Authenticate by email and password, returning the issued token and
    /// the user row. Unknown email and bad password are indistinguishable to
    /// the caller, with a small fixed delay against brute forcing.
    pub async fn login(&self, dto: LoginRequestDto, meta: &RequestMeta) -> Result<(String, User)> {
        dto.validate()
            .map_err(|e| AppError::Validation(collect_field_errors(&e)))?;

        let email = dto.email.trim().to_lowercase();

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(&email)
        .fetch_optional(&self.pool)
        .await?;

        let credentials_ok = match &user {
            Some(user) => password::verify_password(&dto.password, &user.password_hash)?,
            None => false,
        };

        let user = match (user, credentials_ok) {
            (Some(user), true) => user,
            _ => {
                tokio::time::sleep(Duration::from_secs(1)).await;
                return Err(AppError::Auth(
                    "Email ou mot de passe incorrect".to_string(),
                ));
            }
        };

        if !user.is_active {
            return Err(AppError::Forbidden(
                "Votre compte a été désactivé. Contactez l'administration.".to_string(),
            ));
        }

        let token = self.token_service.issue(user.id)?;

        // Audit mirror of the stateless token; not consulted for revocation
        let token_hash = hex::encode(Sha256::digest(token.as_bytes()));
        let expires_at = Utc::now() + chrono::Duration::seconds(self.token_service.ttl_secs());

        sqlx::query(
            r#"
            INSERT INTO sessions (user_id, token_hash, ip_address, user_agent, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&token_hash)
        .bind(meta.ip_address.as_deref())
        .bind(meta.user_agent.as_deref())
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record session: {:?}", e);
            AppError::Database(e)
        })?;

        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(user.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update last login: {:?}", e);
                AppError::Database(e)
            })?;

        if let Err(e) = self
            .activity
            .record(
                user.id,
                "login",
                None,
                meta.ip_address.as_deref(),
                meta.user_agent.as_deref(),
            )
            .await
        {
            tracing::warn!("Failed to log login for {}: {}", user.id, e);
        }

        tracing::info!("User {} logged in", user.id);

        Ok((token, user))
    }

    pub fn token_ttl_secs(&self) -> i64 {
        self.token_service.ttl_secs()
    }

    /// Verify a bearer token and resolve it to an active user.
    pub async fn authenticate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let claims = self.token_service.verify(token)?;
        self.load_active_user(claims.user_id)
            .await?
            .ok_or_else(|| AppError::Auth("Compte introuvable ou désactivé".to_string()))
    }

    /// Load an active user by id; inactive or deleted accounts resolve to None.
    pub async fn load_active_user(&self, user_id: Uuid) -> Result<Option<AuthenticatedUser>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1 AND is_active = TRUE",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(AuthenticatedUser::from))
    }
}

fn generate_verification_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_tokens_are_64_hex_chars_and_unique() {
        let first = generate_verification_token();
        let second = generate_verification_token();
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }
}
