use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::models::User;
use crate::shared::validation::validate_password_strength;

/// Request DTO for account registration
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(length(min = 2, max = 100, message = "doit contenir entre 2 et 100 caractères"))]
    pub first_name: String,

    #[validate(length(min = 2, max = 100, message = "doit contenir entre 2 et 100 caractères"))]
    pub last_name: String,

    #[validate(email(message = "format d'email invalide"))]
    pub email: String,

    #[validate(custom(function = validate_password_strength))]
    pub password: String,

    #[validate(length(max = 30, message = "ne peut pas dépasser 30 caractères"))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 100, message = "doit contenir entre 1 et 100 caractères"))]
    pub home_city: Option<String>,
}

/// Response DTO for account registration
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponseDto {
    pub user_id: Uuid,
}

/// Request DTO for login
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "format d'email invalide"))]
    pub email: String,

    #[validate(length(min = 1, message = "est requis"))]
    pub password: String,
}

/// User projection returned by login and /api/auth/me
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub email_verified: bool,
}

impl From<&User> for AuthUserDto {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            email: u.email.clone(),
            role: u.role.clone(),
            email_verified: u.email_verified,
        }
    }
}

/// Response DTO for login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: AuthUserDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::{FirstName, LastName};
    use fake::Fake;
    use validator::Validate;

    fn valid_dto() -> RegisterRequestDto {
        RegisterRequestDto {
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            email: SafeEmail().fake(),
            password: "Douala2024".to_string(),
            phone: None,
            home_city: Some("Douala".to_string()),
        }
    }

    #[test]
    fn accepts_valid_registration() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn rejects_weak_password() {
        let mut dto = valid_dto();
        dto.password = "motdepasse".to_string();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn rejects_invalid_email_and_short_name_together() {
        let mut dto = valid_dto();
        dto.email = "pas-un-email".to_string();
        dto.first_name = "A".to_string();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("first_name"));
    }
}
