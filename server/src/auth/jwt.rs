//! JWT session tokens

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::{User, UserRole};

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("cannot issue token: {0}")]
    Issue(String),
}

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User record id ("user:xyz")
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// JWT issue/validate service
#[derive(Debug, Clone)]
pub struct JwtService {
    secret: String,
    ttl_hours: i64,
}

impl JwtService {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_hours,
        }
    }

    /// Issue a token for a persisted user
    pub fn issue(&self, user: &User) -> Result<String, JwtError> {
        let id = user
            .id
            .as_ref()
            .ok_or_else(|| JwtError::Issue("user has no id".into()))?;
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now + self.ttl_hours * 3600,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| JwtError::Issue(e.to_string()))
    }

    /// Validate a token and return its claims
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Invalid(e.to_string()),
        })
    }

    /// Pull the token out of an `Authorization: Bearer ...` header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::RecordId;

    fn user() -> User {
        User {
            id: Some(RecordId::from_table_key("user", "alice")),
            email: "alice@example.com".into(),
            name: "Alice".into(),
            password_hash: "x".into(),
            role: UserRole::Customer,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_validate_round_trip() {
        let service = JwtService::new("secret", 24);
        let token = service.issue(&user()).unwrap();
        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.sub, "user:alice");
        assert_eq!(claims.role, UserRole::Customer);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new("secret", -1);
        let token = service.issue(&user()).unwrap();
        assert!(matches!(service.validate(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtService::new("secret-a", 24).issue(&user()).unwrap();
        assert!(matches!(
            JwtService::new("secret-b", 24).validate(&token),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(
            JwtService::extract_from_header("Bearer abc.def.ghi"),
            Some("abc.def.ghi")
        );
        assert_eq!(JwtService::extract_from_header("Basic xyz"), None);
    }
}
