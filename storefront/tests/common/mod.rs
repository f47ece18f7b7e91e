// storefront/tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storefront::config::AppConfig;
use storefront::db::StoreRepository;
use storefront::errors::{AppError, Result};
use storefront::models::{PaymentIntent, PaymentIntentStatus, Product, Store};
use storefront::services::payment_mock::MockCheckout;
use storefront::services::MockPaymentProvider;
use storefront::state::AppState;
use tracing::Level;

pub const STORE_ID: i32 = 1;
pub const OTHER_STORE_ID: i32 = 2;
pub const CONNECTED_ACCOUNT: &str = "acct_skate_shop";
pub const POSTAL_CODE: &str = "SW1A 1AA";
pub const CART_ID: &str = "cart_42";

/// Catalog kept in memory, with counters for asserting which lookups happened.
#[derive(Default)]
pub struct InMemoryStoreRepository {
  stores: Mutex<HashMap<i32, Store>>,
  products: Mutex<Vec<Product>>,
  pub store_lookups: AtomicUsize,
  pub product_lookups: AtomicUsize,
  /// Highest number of `find_store` calls that were in flight at the same time.
  pub max_store_lookups_in_flight: AtomicUsize,
  store_lookups_in_flight: AtomicUsize,
  store_latency_ms: AtomicU64,
  fail_products: AtomicBool,
}

impl InMemoryStoreRepository {
  pub fn add_store(&self, id: i32, name: &str, stripe_account_id: Option<&str>) {
    self.stores.lock().unwrap().insert(
      id,
      Store {
        id,
        name: name.to_string(),
        stripe_account_id: stripe_account_id.map(str::to_string),
      },
    );
  }

  pub fn add_product(&self, id: i32, store_id: i32, name: &str, price: Decimal) {
    self.products.lock().unwrap().push(Product {
      id,
      store_id,
      name: name.to_string(),
      price,
      inventory: 10,
    });
  }

  /// Delays every `find_store`, like a database round trip would.
  pub fn set_store_latency(&self, latency: Duration) {
    self.store_latency_ms.store(latency.as_millis() as u64, Ordering::SeqCst);
  }

  pub fn fail_product_lookups(&self) {
    self.fail_products.store(true, Ordering::SeqCst);
  }
}

#[async_trait]
impl StoreRepository for InMemoryStoreRepository {
  async fn find_store(&self, store_id: i32) -> Result<Option<Store>> {
    self.store_lookups.fetch_add(1, Ordering::SeqCst);
    let in_flight = self.store_lookups_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    self.max_store_lookups_in_flight.fetch_max(in_flight, Ordering::SeqCst);

    let latency = self.store_latency_ms.load(Ordering::SeqCst);
    if latency > 0 {
      tokio::time::sleep(Duration::from_millis(latency)).await;
    }

    self.store_lookups_in_flight.fetch_sub(1, Ordering::SeqCst);
    Ok(self.stores.lock().unwrap().get(&store_id).cloned())
  }

  async fn find_products(&self, store_id: i32, product_ids: &[i32]) -> Result<Vec<Product>> {
    self.product_lookups.fetch_add(1, Ordering::SeqCst);
    if self.fail_products.load(Ordering::SeqCst) {
      return Err(AppError::Sqlx(sqlx::Error::PoolTimedOut));
    }
    Ok(
      self
        .products
        .lock()
        .unwrap()
        .iter()
        .filter(|p| p.store_id == store_id && product_ids.contains(&p.id))
        .cloned()
        .collect(),
    )
  }
}

/// Store 1 ("Skate Shop", connected account) with a deck and wheels; store 2 with a helmet.
pub fn seeded_catalog() -> Arc<InMemoryStoreRepository> {
  let repo = InMemoryStoreRepository::default();
  repo.add_store(STORE_ID, "Skate Shop", Some(CONNECTED_ACCOUNT));
  repo.add_store(OTHER_STORE_ID, "Board Barn", None);
  repo.add_product(10, STORE_ID, "Deck", Decimal::new(1000, 2));
  repo.add_product(11, STORE_ID, "Wheels", Decimal::new(550, 2));
  repo.add_product(20, OTHER_STORE_ID, "Helmet", Decimal::new(4000, 2));
  Arc::new(repo)
}

pub const ITEMS_JSON: &str =
  r#"[{"productId":10,"quantity":2,"price":"10.00"},{"productId":11,"quantity":1,"price":"5.50"}]"#;

/// A paid checkout of the seeded store: two decks and one set of wheels.
pub fn paid_checkout() -> MockCheckout {
  MockCheckout {
    store_id: STORE_ID,
    amount: 2550,
    currency: "usd".to_string(),
    cart_id: Some(CART_ID.to_string()),
    items_json: ITEMS_JSON.to_string(),
    shipping_postal_code: Some(POSTAL_CODE.to_string()),
    connected_account: Some(CONNECTED_ACCOUNT.to_string()),
  }
}

pub async fn succeeded_intent(payments: &MockPaymentProvider) -> PaymentIntent {
  payments.create_intent(paid_checkout(), PaymentIntentStatus::Succeeded).await
}

pub fn test_config(extra: &[(&str, &str)]) -> AppConfig {
  let mut vars: HashMap<String, String> = [
    ("DATABASE_URL", "postgres://localhost/storefront_test"),
    ("PAYMENT_PROVIDER", "mock"),
    ("APP_BASE_URL", "http://shop.test"),
  ]
  .iter()
  .map(|(k, v)| (k.to_string(), v.to_string()))
  .collect();
  vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
  AppConfig::from_lookup(|name| vars.get(name).cloned()).expect("test config should be valid")
}

pub fn app_state(repo: Arc<InMemoryStoreRepository>, payments: MockPaymentProvider) -> AppState {
  AppState::new(Arc::new(test_config(&[])), repo, Arc::new(payments))
}

static TRACING: Lazy<()> = Lazy::new(|| {
  let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    tracing_subscriber::EnvFilter::new(Level::DEBUG.to_string())
      .add_directive("sqlx=warn".parse().unwrap())
      .add_directive("actix_web=info".parse().unwrap())
  });
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}
