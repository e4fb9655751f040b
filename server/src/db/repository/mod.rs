//! Repository Module
//!
//! CRUD and conditional-update operations over SurrealDB tables.

// Identity
pub mod user;
pub mod vendor;

// Catalog
pub mod listing;
pub mod product;

// Orders
pub mod order;
pub mod payment;

// Feedback
pub mod report;
pub mod review;

// Re-exports
pub use listing::ListingRepository;
pub use order::OrderRepository;
pub use payment::PaymentRepository;
pub use product::ProductRepository;
pub use report::ReportRepository;
pub use review::ReviewRepository;
pub use user::UserRepository;
pub use vendor::VendorRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations surface as "index ... already contains"
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

impl From<RepoError> for shared::error::AppError {
    fn from(err: RepoError) -> Self {
        use shared::error::{AppError, ErrorCode};
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" strings at the API surface, RecordId internally
// =============================================================================

/// Parse an id that may be either `"table:key"` or a bare key.
///
/// Rejects ids that name a different table, so a caller can never smuggle
/// a `listing:` id into an order lookup.
pub fn parse_id(table: &str, id: &str) -> RepoResult<RecordId> {
    match id.split_once(':') {
        Some((t, key)) if t == table => Ok(RecordId::from_table_key(table, key)),
        Some((t, _)) => Err(RepoError::Validation(format!(
            "expected {} id, got {}",
            table, t
        ))),
        None => Ok(RecordId::from_table_key(table, id)),
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_accepts_both_forms() {
        let a = parse_id("listing", "listing:abc").unwrap();
        let b = parse_id("listing", "abc").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "listing:abc");
    }

    #[test]
    fn test_parse_id_rejects_wrong_table() {
        assert!(parse_id("customer_order", "listing:abc").is_err());
    }
}
