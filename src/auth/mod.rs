pub mod fingerprint;
pub mod identity;
pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account id of the authenticated admin.
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: Uuid, email: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub,
            email,
            exp,
            iat: now.timestamp(),
        }
    }
}

/// Session tokens handed back by the gatekeeper on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// Mint a session for an authenticated admin account.
pub fn issue_session(account_id: Uuid, email: &str) -> Result<Session, JwtError> {
    let claims = Claims::new(account_id, email.to_string());
    let expires_in = claims.exp - claims.iat;
    let access_token = generate_jwt(&claims)?;

    Ok(Session {
        access_token,
        token_type: "bearer".to_string(),
        expires_in,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_session_round_trips_through_validation() {
        // Development config carries a non-empty default secret
        std::env::remove_var("APP_ENV");

        let account_id = Uuid::new_v4();
        let session = issue_session(account_id, "admin@example.com").unwrap();
        assert_eq!(session.token_type, "bearer");
        assert!(session.expires_in > 0);

        let claims = validate_jwt(&session.access_token).unwrap();
        assert_eq!(claims.sub, account_id);
        assert_eq!(claims.email, "admin@example.com");
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert!(matches!(
            validate_jwt("not-a-jwt"),
            Err(JwtError::InvalidToken(_))
        ));
    }
}
