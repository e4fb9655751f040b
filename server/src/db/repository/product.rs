//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find active products, optionally restricted to a category
    pub async fn find_all(
        &self,
        category: Option<String>,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = if let Some(category) = category {
            self.base
                .db()
                .query(
                    "SELECT * FROM product WHERE active = true AND category = $category \
                     ORDER BY name LIMIT $limit START $offset",
                )
                .bind(("category", category))
                .bind(("limit", limit))
                .bind(("offset", offset))
                .await?
                .take(0)?
        } else {
            self.base
                .db()
                .query(
                    "SELECT * FROM product WHERE active = true \
                     ORDER BY name LIMIT $limit START $offset",
                )
                .bind(("limit", limit))
                .bind(("offset", offset))
                .await?
                .take(0)?
        };
        Ok(products)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let product: Option<Product> = self.base.db().select(parse_id(PRODUCT_TABLE, id)?).await?;
        Ok(product)
    }

    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let product: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(Product {
                id: None,
                name: data.name,
                category: data.category,
                description: data.description,
                active: true,
                created_at: Utc::now(),
            })
            .await?;
        product.ok_or_else(|| RepoError::Database("create returned no product".into()))
    }

    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let product: Option<Product> = self
            .base
            .db()
            .update(parse_id(PRODUCT_TABLE, id)?)
            .merge(data)
            .await?;
        product.ok_or_else(|| RepoError::NotFound(format!("product {}", id)))
    }
}
