use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Claims carried in the bearer token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: Uuid,
    /// Issued-at, Unix seconds
    pub iat: i64,
    /// Expiry, Unix seconds
    pub exp: i64,
}

/// Issues and verifies compact HS256 bearer tokens.
///
/// Tokens are three base64url segments (`header.payload.signature`) signed
/// with HMAC-SHA256 over the first two segments. Verification is stateless:
/// no revocation list is consulted, so a token stays valid until expiry.
pub struct TokenService {
    secret: Vec<u8>,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.as_bytes().to_vec(),
            ttl_secs: config.token_ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a token for the given user, valid for the configured lifetime.
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    fn issue_at(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<String> {
        let header = serde_json::json!({"typ": "JWT", "alg": "HS256"});
        let claims = TokenClaims {
            user_id,
            iat: now.timestamp(),
            exp: now.timestamp() + self.ttl_secs,
        };

        let header_b64 = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&header)
                .map_err(|e| AppError::Internal(format!("Failed to encode token header: {}", e)))?,
        );
        let payload_b64 = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&claims)
                .map_err(|e| AppError::Internal(format!("Failed to encode token claims: {}", e)))?,
        );

        let signing_input = format!("{}.{}", header_b64, payload_b64);
        let signature_b64 = URL_SAFE_NO_PAD.encode(self.sign(signing_input.as_bytes())?);

        Ok(format!("{}.{}", signing_input, signature_b64))
    }

    /// Verify a token and return its claims.
    ///
    /// Fails on anything that is not exactly three segments, on a signature
    /// mismatch (checked in constant time) and on an expired payload.
    pub fn verify(&self, token: &str) -> Result<TokenClaims> {
        self.verify_at(token, Utc::now())
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(AppError::Auth("Token invalide".to_string()));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(parts[2])
            .map_err(|_| AppError::Auth("Token invalide".to_string()))?;

        let signing_input = format!("{}.{}", parts[0], parts[1]);
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AppError::Auth("Token invalide".to_string()))?;

        let payload = URL_SAFE_NO_PAD
            .decode(parts[1])
            .map_err(|_| AppError::Auth("Token invalide".to_string()))?;
        let claims: TokenClaims = serde_json::from_slice(&payload)
            .map_err(|_| AppError::Auth("Token invalide".to_string()))?;

        if claims.exp < now.timestamp() {
            return Err(AppError::Auth("Token expiré".to_string()));
        }

        Ok(claims)
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn service() -> TokenService {
        TokenService::new(&AuthConfig {
            jwt_secret: "une_cle_secrete_de_test_suffisamment_longue".to_string(),
            token_ttl_secs: 24 * 60 * 60,
        })
    }

    #[test]
    fn round_trip_returns_original_user_id() {
        let svc = service();
        let user_id = Uuid::new_v4();

        let token = svc.issue(user_id).unwrap();
        let claims = svc.verify(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.exp, claims.iat + svc.ttl_secs());
    }

    #[test]
    fn rejects_tampered_signature() {
        let svc = service();
        let token = svc.issue(Uuid::new_v4()).unwrap();

        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[2] = URL_SAFE_NO_PAD.encode(b"forged-signature");
        let tampered = parts.join(".");

        assert!(svc.verify(&tampered).is_err());
    }

    #[test]
    fn rejects_tampered_payload() {
        let svc = service();
        let token = svc.issue(Uuid::new_v4()).unwrap();

        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let other_claims = TokenClaims {
            user_id: Uuid::new_v4(),
            iat: 0,
            exp: i64::MAX,
        };
        parts[1] = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&other_claims).unwrap());
        let tampered = parts.join(".");

        assert!(svc.verify(&tampered).is_err());
    }

    #[test]
    fn rejects_malformed_token() {
        let svc = service();
        assert!(svc.verify("").is_err());
        assert!(svc.verify("only.two").is_err());
        assert!(svc.verify("a.b.c.d").is_err());
        assert!(svc.verify("not base64!.at.all").is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let svc = service();
        let issued = Utc::now() - Duration::hours(25);
        let token = svc.issue_at(Uuid::new_v4(), issued).unwrap();

        match svc.verify(&token) {
            Err(AppError::Auth(msg)) => assert_eq!(msg, "Token expiré"),
            other => panic!("expected expired-token error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn token_is_not_valid_across_secrets() {
        let svc = service();
        let other = TokenService::new(&AuthConfig {
            jwt_secret: "une_autre_cle_secrete_de_test_differente".to_string(),
            token_ttl_secs: 24 * 60 * 60,
        });

        let token = svc.issue(Uuid::new_v4()).unwrap();
        assert!(other.verify(&token).is_err());
    }
}
