//! Vendor Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Vendor, VendorCreate, VendorUpdate};
use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const VENDOR_TABLE: &str = "vendor";

#[derive(Clone)]
pub struct VendorRepository {
    base: BaseRepository,
}

impl VendorRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a vendor profile; one per user (unique index on `user`)
    pub async fn create(&self, user: RecordId, data: VendorCreate) -> RepoResult<Vendor> {
        let vendor: Option<Vendor> = self
            .base
            .db()
            .create(VENDOR_TABLE)
            .content(Vendor {
                id: None,
                user,
                store_name: data.store_name,
                description: data.description,
                verified: false,
                created_at: Utc::now(),
            })
            .await?;
        vendor.ok_or_else(|| RepoError::Database("create returned no vendor".into()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Vendor>> {
        let vendor: Option<Vendor> = self.base.db().select(parse_id(VENDOR_TABLE, id)?).await?;
        Ok(vendor)
    }

    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Option<Vendor>> {
        let vendors: Vec<Vendor> = self
            .base
            .db()
            .query("SELECT * FROM vendor WHERE user = $user")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(vendors.into_iter().next())
    }

    pub async fn update(&self, id: &str, data: VendorUpdate) -> RepoResult<Vendor> {
        let vendor: Option<Vendor> = self
            .base
            .db()
            .update(parse_id(VENDOR_TABLE, id)?)
            .merge(data)
            .await?;
        vendor.ok_or_else(|| RepoError::NotFound(format!("vendor {}", id)))
    }

    /// Admin verification toggle
    pub async fn set_verified(&self, id: &str, verified: bool) -> RepoResult<Vendor> {
        let vendor: Option<Vendor> = self
            .base
            .db()
            .update(parse_id(VENDOR_TABLE, id)?)
            .merge(serde_json::json!({ "verified": verified }))
            .await?;
        vendor.ok_or_else(|| RepoError::NotFound(format!("vendor {}", id)))
    }
}
