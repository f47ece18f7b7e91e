// storefront/src/services/payment_provider.rs

use crate::errors::Result;
use crate::models::PaymentIntent;
use async_trait::async_trait;

#[async_trait]
pub trait PaymentProvider: Send + Sync {
  /// Looks up an intent by id.
  ///
  /// `connected_account` scopes the lookup to a store's connected account; `None` means
  /// the platform account. `Ok(None)` means the provider has no such intent.
  async fn retrieve_payment_intent(
    &self,
    payment_intent_id: &str,
    connected_account: Option<&str>,
  ) -> Result<Option<PaymentIntent>>;
}
