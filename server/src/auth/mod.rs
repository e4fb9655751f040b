//! Authentication and authorization
//!
//! JWT bearer sessions with argon2id password hashes. Handlers receive
//! the caller as a [`CurrentUser`] extractor; role checks are methods on
//! it rather than separate middleware.

mod extractor;
pub mod jwt;

pub use jwt::{Claims, JwtError, JwtService};

use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{PasswordHash, SaltString, rand_core::OsRng},
};
use surrealdb::RecordId;

use crate::db::models::UserRole;
use shared::error::{AppError, AppResult, ErrorCode};

/// Hash a password with argon2id and a fresh salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("password hashing failed: {e}")))
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// The authenticated caller, extracted from the session token
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User record id ("user:xyz")
    pub id: String,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// The caller's id as a RecordId
    pub fn record_id(&self) -> AppResult<RecordId> {
        self.id
            .parse()
            .map_err(|_| AppError::internal(format!("malformed user id in token: {}", self.id)))
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::new(ErrorCode::AdminRequired))
        }
    }

    pub fn require_vendor(&self) -> AppResult<()> {
        if self.role == UserRole::Vendor || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::new(ErrorCode::VendorRequired))
        }
    }
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        if claims.sub.is_empty() {
            return Err("empty subject".into());
        }
        Ok(Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("hunter2-but-longer").unwrap();
        assert!(verify_password("hunter2-but-longer", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_role_guards() {
        let customer = CurrentUser {
            id: "user:c".into(),
            email: "c@example.com".into(),
            role: UserRole::Customer,
        };
        assert!(customer.require_admin().is_err());
        assert!(customer.require_vendor().is_err());

        let admin = CurrentUser {
            id: "user:a".into(),
            email: "a@example.com".into(),
            role: UserRole::Admin,
        };
        assert!(admin.require_admin().is_ok());
        assert!(admin.require_vendor().is_ok());
    }
}
