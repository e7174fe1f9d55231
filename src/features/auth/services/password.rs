use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::core::error::{AppError, Result};

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Check a password against a stored hash. Returns `false` on mismatch,
/// errors only if the stored hash itself is unreadable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid stored password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("Douala2024").unwrap();
        assert!(verify_password("Douala2024", &hash).unwrap());
        assert!(!verify_password("Yaounde2024", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("Douala2024").unwrap();
        let second = hash_password("Douala2024").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn unreadable_hash_is_an_error() {
        assert!(verify_password("Douala2024", "not-a-phc-string").is_err());
    }
}
