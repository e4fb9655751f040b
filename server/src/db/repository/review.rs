//! Review Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Review, ReviewUpdate};
use serde::Deserialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const REVIEW_TABLE: &str = "review";

/// Read-time rating aggregate
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RatingStats {
    pub count: i64,
    pub mean: Option<f64>,
}

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert a review; the unique (user, order_ref, product) index turns
    /// concurrent duplicates into `Duplicate` errors deterministically.
    pub async fn create(&self, review: Review) -> RepoResult<Review> {
        let created: Option<Review> = self.base.db().create(REVIEW_TABLE).content(review).await?;
        created.ok_or_else(|| RepoError::Database("create returned no review".into()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Review>> {
        let review: Option<Review> = self.base.db().select(parse_id(REVIEW_TABLE, id)?).await?;
        Ok(review)
    }

    pub async fn find_by_product(
        &self,
        product: &RecordId,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Review>> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query(
                "SELECT * FROM review WHERE product = $product \
                 ORDER BY created_at DESC LIMIT $limit START $offset",
            )
            .bind(("product", product.clone()))
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    pub async fn update(&self, id: &str, data: ReviewUpdate) -> RepoResult<Review> {
        let review: Option<Review> = self
            .base
            .db()
            .update(parse_id(REVIEW_TABLE, id)?)
            .merge(data)
            .await?;
        review.ok_or_else(|| RepoError::NotFound(format!("review {}", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let _: Option<Review> = self.base.db().delete(parse_id(REVIEW_TABLE, id)?).await?;
        Ok(())
    }

    /// Aggregated rating for a product (computed at read time)
    pub async fn stats_for_product(&self, product: &RecordId) -> RepoResult<RatingStats> {
        let stats: Vec<RatingStats> = self
            .base
            .db()
            .query(
                "SELECT count() AS count, math::mean(rating) AS mean \
                 FROM review WHERE product = $product GROUP ALL",
            )
            .bind(("product", product.clone()))
            .await?
            .take(0)?;
        Ok(stats
            .into_iter()
            .next()
            .unwrap_or(RatingStats { count: 0, mean: None }))
    }

    /// Aggregated rating across a vendor's reviewed listings
    pub async fn stats_for_vendor(&self, vendor: &RecordId) -> RepoResult<RatingStats> {
        let stats: Vec<RatingStats> = self
            .base
            .db()
            .query(
                "SELECT count() AS count, math::mean(rating) AS mean \
                 FROM review WHERE vendor = $vendor GROUP ALL",
            )
            .bind(("vendor", vendor.clone()))
            .await?
            .take(0)?;
        Ok(stats
            .into_iter()
            .next()
            .unwrap_or(RatingStats { count: 0, mean: None }))
    }
}
