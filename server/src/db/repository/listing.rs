//! Listing Repository
//!
//! Stock mutations are conditional updates only: a decrement that would
//! take stock negative simply matches nothing and reports failure.

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Listing, ListingUpdate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const LISTING_TABLE: &str = "listing";

#[derive(Clone)]
pub struct ListingRepository {
    base: BaseRepository,
}

impl ListingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, listing: Listing) -> RepoResult<Listing> {
        let created: Option<Listing> = self
            .base
            .db()
            .create(LISTING_TABLE)
            .content(listing)
            .await?;
        created.ok_or_else(|| RepoError::Database("create returned no listing".into()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Listing>> {
        let listing: Option<Listing> = self.base.db().select(parse_id(LISTING_TABLE, id)?).await?;
        Ok(listing)
    }

    /// Active offers for a product
    pub async fn find_by_product(&self, product: &RecordId) -> RepoResult<Vec<Listing>> {
        let listings: Vec<Listing> = self
            .base
            .db()
            .query("SELECT * FROM listing WHERE product = $product AND active = true ORDER BY price")
            .bind(("product", product.clone()))
            .await?
            .take(0)?;
        Ok(listings)
    }

    /// All of a vendor's listings, active or not
    pub async fn find_by_vendor(&self, vendor: &RecordId) -> RepoResult<Vec<Listing>> {
        let listings: Vec<Listing> = self
            .base
            .db()
            .query("SELECT * FROM listing WHERE vendor = $vendor ORDER BY created_at DESC")
            .bind(("vendor", vendor.clone()))
            .await?
            .take(0)?;
        Ok(listings)
    }

    pub async fn update(&self, id: &str, data: ListingUpdate) -> RepoResult<Listing> {
        let listing: Option<Listing> = self
            .base
            .db()
            .update(parse_id(LISTING_TABLE, id)?)
            .merge(data)
            .await?;
        listing.ok_or_else(|| RepoError::NotFound(format!("listing {}", id)))
    }

    /// Atomically decrement stock, refusing to go negative.
    ///
    /// Returns `true` if the decrement applied; `false` means the listing
    /// vanished or has less than `qty` in stock.
    pub async fn decrement_stock(&self, id: &RecordId, qty: i64) -> RepoResult<bool> {
        let updated: Vec<Listing> = self
            .base
            .db()
            .query("UPDATE $listing SET stock -= $qty WHERE stock >= $qty RETURN AFTER")
            .bind(("listing", id.clone()))
            .bind(("qty", qty))
            .await?
            .take(0)?;
        Ok(!updated.is_empty())
    }

    /// Compensation path for a failed settlement attempt
    pub async fn restore_stock(&self, id: &RecordId, qty: i64) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $listing SET stock += $qty")
            .bind(("listing", id.clone()))
            .bind(("qty", qty))
            .await?
            .check()?;
        Ok(())
    }
}
