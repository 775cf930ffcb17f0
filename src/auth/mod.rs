//! Stateless credentials: HS256-signed JWTs carrying the user id and an
//! absolute expiry.

pub mod password;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Malformed(String),
    #[error("JWT generation error: {0}")]
    Generation(String),
}

/// Issues and verifies credentials with a server-held symmetric key.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against our own clock exactly.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            security.jwt_secret.as_bytes(),
            Duration::hours(security.jwt_expiry_hours as i64),
        )
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if it had been minted at `issued_at`.
    pub fn issue_at(&self, user_id: i64, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            user_id,
            exp: (issued_at + self.ttl).timestamp(),
            iat: issued_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.user_id)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> TokenService {
        TokenService::new(b"test-secret", Duration::hours(24))
    }

    #[test]
    fn issued_token_verifies_to_same_user() {
        let tokens = service();
        let token = tokens.issue(42).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(tokens.verify(&token), Ok(42));
    }

    #[test]
    fn token_is_valid_until_ttl_elapses() {
        let tokens = service();
        let token = tokens.issue_at(7, Utc::now() - Duration::hours(23)).unwrap();
        assert_eq!(tokens.verify(&token), Ok(7));
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service();
        let token = tokens.issue_at(7, Utc::now() - Duration::hours(25)).unwrap();
        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_is_malformed() {
        let err = service().verify("invalid.token.here").unwrap_err();
        assert!(matches!(err, TokenError::Malformed(_)));
        assert!(err.to_string().starts_with("Invalid token"));
    }

    #[test]
    fn wrong_signature_is_malformed() {
        let forged = TokenService::new(b"wrong-secret", Duration::hours(24)).issue(1).unwrap();
        assert!(matches!(service().verify(&forged), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn missing_user_id_is_malformed() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({ "exp": exp }),
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(matches!(service().verify(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn missing_expiry_is_malformed() {
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({ "user_id": 1 }),
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(matches!(service().verify(&token), Err(TokenError::Malformed(_))));
    }
}
