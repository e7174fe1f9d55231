use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref HAS_UPPERCASE: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref HAS_LOWERCASE: Regex = Regex::new(r"[a-z]").unwrap();
    static ref HAS_DIGIT: Regex = Regex::new(r"[0-9]").unwrap();
}

/// Password policy: at least 8 characters with one uppercase letter, one
/// lowercase letter and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.len() < 8
        || !HAS_UPPERCASE.is_match(password)
        || !HAS_LOWERCASE.is_match(password)
        || !HAS_DIGIT.is_match(password)
    {
        let mut error = ValidationError::new("weak_password");
        error.message = Some(
            "doit contenir au moins 8 caractères, une majuscule, une minuscule et un chiffre"
                .into(),
        );
        return Err(error);
    }
    Ok(())
}

/// Flatten `validator` errors into one message per violated field.
pub fn collect_field_errors(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{}: {}", field, msg),
                None => format!("{}: valeur invalide", field),
            })
        })
        .collect();
    messages.sort();
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_password_meeting_policy() {
        assert!(validate_password_strength("Douala2024").is_ok());
        assert!(validate_password_strength("aB3aB3aB").is_ok());
    }

    #[test]
    fn rejects_password_without_uppercase() {
        assert!(validate_password_strength("douala2024").is_err());
    }

    #[test]
    fn rejects_password_without_lowercase() {
        assert!(validate_password_strength("DOUALA2024").is_err());
    }

    #[test]
    fn rejects_password_without_digit() {
        assert!(validate_password_strength("DoualaVille").is_err());
    }

    #[test]
    fn rejects_short_password() {
        assert!(validate_password_strength("Ab1").is_err());
    }
}
