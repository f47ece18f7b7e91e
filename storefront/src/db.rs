// storefront/src/db.rs

//! Read-only catalog access used by the order-success flow.

use crate::errors::{AppError, Result};
use crate::models::{Product, Store};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, instrument};

#[async_trait]
pub trait StoreRepository: Send + Sync {
  async fn find_store(&self, store_id: i32) -> Result<Option<Store>>;

  /// Products of `store_id` whose id is in `product_ids`, in no particular order.
  async fn find_products(&self, store_id: i32, product_ids: &[i32]) -> Result<Vec<Product>>;
}

#[derive(Clone)]
pub struct PgStoreRepository {
  pool: PgPool,
}

impl PgStoreRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl StoreRepository for PgStoreRepository {
  #[instrument(name = "db::find_store", skip(self))]
  async fn find_store(&self, store_id: i32) -> Result<Option<Store>> {
    sqlx::query_as::<_, Store>("SELECT id, name, stripe_account_id FROM stores WHERE id = $1")
      .bind(store_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(|e| {
        error!("Database error while fetching store {}: {}", store_id, e);
        AppError::Sqlx(e)
      })
  }

  #[instrument(name = "db::find_products", skip(self), fields(count = product_ids.len()))]
  async fn find_products(&self, store_id: i32, product_ids: &[i32]) -> Result<Vec<Product>> {
    if product_ids.is_empty() {
      return Ok(Vec::new());
    }
    sqlx::query_as::<_, Product>(
      "SELECT id, store_id, name, price, inventory FROM products WHERE store_id = $1 AND id = ANY($2)",
    )
    .bind(store_id)
    .bind(product_ids)
    .fetch_all(&self.pool)
    .await
    .map_err(|e| {
      error!("Database error while fetching products for store {}: {}", store_id, e);
      AppError::Sqlx(e)
    })
  }
}
