// storefront/src/services/payment_mock.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::payment::{METADATA_CART_ID, METADATA_ITEMS, METADATA_STORE_ID};
use crate::models::{PaymentIntent, PaymentIntentStatus};
use crate::services::payment_provider::PaymentProvider;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredIntent {
  connected_account: Option<String>,
  intent: PaymentIntent,
}

/// What a mock checkout recorded on the intent.
#[derive(Debug, Clone, Default)]
pub struct MockCheckout {
  pub store_id: i32,
  pub amount: i64,
  pub currency: String,
  pub cart_id: Option<String>,
  /// Serialized checkout item list.
  pub items_json: String,
  pub shipping_postal_code: Option<String>,
  pub connected_account: Option<String>,
}

/// In-memory payment provider.
///
/// Intents are only visible under the connected account they were created with.
#[derive(Clone, Default)]
pub struct MockPaymentProvider {
  intents: Arc<RwLock<HashMap<String, StoredIntent>>>,
  fail_next: Arc<AtomicBool>,
  lookups: Arc<AtomicUsize>,
  latency: Duration,
}

impl MockPaymentProvider {
  pub fn new() -> Self {
    Self::default()
  }

  /// Delays every lookup, like a network round trip would.
  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }

  /// Records a checkout and returns the resulting intent with the given status.
  #[instrument(name = "payment_mock::create_intent", skip(self, checkout), fields(store_id = checkout.store_id))]
  pub async fn create_intent(&self, checkout: MockCheckout, status: PaymentIntentStatus) -> PaymentIntent {
    let intent_id = format!("pi_mock_{}", Uuid::new_v4().simple());
    let mut metadata = HashMap::from([
      (METADATA_STORE_ID.to_string(), checkout.store_id.to_string()),
      (METADATA_ITEMS.to_string(), checkout.items_json),
    ]);
    if let Some(cart_id) = checkout.cart_id {
      metadata.insert(METADATA_CART_ID.to_string(), cart_id);
    }

    let intent = PaymentIntent {
      id: intent_id.clone(),
      amount: checkout.amount,
      currency: checkout.currency,
      status,
      client_secret: Some(format!("{}_secret_{}", intent_id, Uuid::new_v4().simple())),
      metadata,
      shipping_postal_code: checkout.shipping_postal_code,
      created: Utc::now(),
    };
    self.intents.write().await.insert(
      intent_id,
      StoredIntent {
        connected_account: checkout.connected_account,
        intent: intent.clone(),
      },
    );
    info!("Mock payment intent {} created with status {:?}", intent.id, intent.status);
    intent
  }

  /// Makes the next lookup fail with a provider error.
  pub fn fail_next_lookup(&self) {
    self.fail_next.store(true, Ordering::SeqCst);
  }

  pub fn lookup_count(&self) -> usize {
    self.lookups.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
  #[instrument(name = "payment_mock::retrieve_payment_intent", skip(self))]
  async fn retrieve_payment_intent(
    &self,
    payment_intent_id: &str,
    connected_account: Option<&str>,
  ) -> AppResult<Option<PaymentIntent>> {
    self.lookups.fetch_add(1, Ordering::SeqCst);
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
    if self.fail_next.swap(false, Ordering::SeqCst) {
      return Err(AppError::Stripe("Mock provider failure due to test condition".to_string()));
    }

    let intents = self.intents.read().await;
    Ok(
      intents
        .get(payment_intent_id)
        .filter(|stored| stored.connected_account.as_deref() == connected_account)
        .map(|stored| stored.intent.clone()),
    )
  }
}
