//! Database Module
//!
//! Embedded SurrealDB connection plus schema/index definition.

pub mod models;
pub mod repository;

use std::path::Path;

use shared::error::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "bazaar";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database under `db_dir` (RocksDB backend)
    pub async fn new(db_dir: &Path) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_dir)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        tracing::info!(path = %db_dir.display(), "Database opened (embedded RocksDB)");
        Self::prepare(db).await
    }

    /// Open a fresh in-memory database (tests)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        Ok(Self { db })
    }
}

/// Idempotent schema definition.
///
/// The unique indexes are load-bearing: duplicate reviews and duplicate
/// payments must fail at the storage layer, not in application checks.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    const SCHEMA: &str = "
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS uniq_user_email ON TABLE user COLUMNS email UNIQUE;

        DEFINE TABLE IF NOT EXISTS vendor SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS uniq_vendor_user ON TABLE vendor COLUMNS user UNIQUE;

        DEFINE TABLE IF NOT EXISTS product SCHEMALESS;

        DEFINE TABLE IF NOT EXISTS listing SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS uniq_listing_offer ON TABLE listing COLUMNS vendor, product UNIQUE;

        DEFINE TABLE IF NOT EXISTS customer_order SCHEMALESS;

        DEFINE TABLE IF NOT EXISTS payment SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS uniq_payment_order ON TABLE payment COLUMNS order_ref UNIQUE;

        DEFINE TABLE IF NOT EXISTS review SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS uniq_review_purchase ON TABLE review COLUMNS user, order_ref, product UNIQUE;

        DEFINE TABLE IF NOT EXISTS report SCHEMALESS;
    ";

    db.query(SCHEMA)
        .await
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
        .check()
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

    tracing::info!("Database schema defined");
    Ok(())
}
