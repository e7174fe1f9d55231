use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Database model for a registered user
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub phone: Option<String>,
    pub home_city: Option<String>,
    pub email_verified: bool,
    pub verification_token: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public display name: first name plus abbreviated last name ("Aminatou N.")
    pub fn display_name(&self) -> String {
        match self.last_name.chars().next() {
            Some(initial) => format!("{} {}.", self.first_name, initial),
            None => self.first_name.clone(),
        }
    }
}

/// Authenticated user attached to the request by the auth middleware
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub home_city: Option<String>,
    pub email_verified: bool,
}

impl From<User> for AuthenticatedUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            role: u.role,
            home_city: u.home_city,
            email_verified: u.email_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Aminatou".to_string(),
            last_name: "Ndongo".to_string(),
            email: "aminatou@example.cm".to_string(),
            password_hash: String::new(),
            role: "citizen".to_string(),
            is_active: true,
            phone: None,
            home_city: Some("Douala".to_string()),
            email_verified: false,
            verification_token: None,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn display_name_abbreviates_last_name() {
        assert_eq!(sample_user().display_name(), "Aminatou N.");
    }
}
