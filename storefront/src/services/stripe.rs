// storefront/src/services/stripe.rs

use crate::errors::{AppError, Result};
use crate::models::{PaymentIntent, PaymentIntentStatus};
use crate::services::payment_provider::PaymentProvider;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct StripeConfig {
  pub secret_key: String,
  /// Without trailing slash, e.g. `https://api.stripe.com`.
  pub api_base: String,
  pub timeout: Duration,
}

/// Payment provider backed by the Stripe REST API.
#[derive(Clone)]
pub struct StripePaymentProvider {
  config: StripeConfig,
  client: reqwest::Client,
}

impl StripePaymentProvider {
  pub fn new(config: StripeConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| AppError::Config(format!("Could not build Stripe HTTP client: {}", e)))?;
    Ok(Self { config, client })
  }
}

#[derive(Debug, Deserialize)]
struct StripeAddress {
  postal_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeShipping {
  address: Option<StripeAddress>,
}

#[derive(Debug, Deserialize)]
struct StripePaymentIntentBody {
  id: String,
  amount: i64,
  currency: String,
  status: PaymentIntentStatus,
  client_secret: Option<String>,
  #[serde(default)]
  metadata: HashMap<String, String>,
  shipping: Option<StripeShipping>,
  created: i64,
}

impl From<StripePaymentIntentBody> for PaymentIntent {
  fn from(body: StripePaymentIntentBody) -> Self {
    PaymentIntent {
      id: body.id,
      amount: body.amount,
      currency: body.currency,
      status: body.status,
      client_secret: body.client_secret,
      metadata: body.metadata,
      shipping_postal_code: body.shipping.and_then(|s| s.address).and_then(|a| a.postal_code),
      created: DateTime::from_timestamp(body.created, 0).unwrap_or_default(),
    }
  }
}

fn parse_payment_intent(body: &str) -> Result<PaymentIntent> {
  serde_json::from_str::<StripePaymentIntentBody>(body)
    .map(PaymentIntent::from)
    .map_err(|e| AppError::Stripe(format!("Failed to parse Stripe response: {}", e)))
}

/// Intent ids are path segments; anything but `[A-Za-z0-9_]` cannot name an intent.
fn is_plausible_intent_id(id: &str) -> bool {
  !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[async_trait]
impl PaymentProvider for StripePaymentProvider {
  #[instrument(name = "stripe::retrieve_payment_intent", skip(self))]
  async fn retrieve_payment_intent(
    &self,
    payment_intent_id: &str,
    connected_account: Option<&str>,
  ) -> Result<Option<PaymentIntent>> {
    if !is_plausible_intent_id(payment_intent_id) {
      warn!("Rejecting malformed payment intent id.");
      return Ok(None);
    }

    let url = format!("{}/v1/payment_intents/{}", self.config.api_base, payment_intent_id);
    let mut request = self.client.get(&url).basic_auth(&self.config.secret_key, Some(""));
    if let Some(account) = connected_account {
      request = request.header("Stripe-Account", account);
    }

    let response = request.send().await?;
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
      info!("Stripe has no payment intent {}", payment_intent_id);
      return Ok(None);
    }
    let body = response.text().await?;
    if !status.is_success() {
      warn!(%status, "Stripe API error: {}", body);
      return Err(AppError::Stripe(format!("Stripe responded with {}", status)));
    }

    parse_payment_intent(&body).map(Some)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = r#"{
    "id": "pi_3Nabc",
    "object": "payment_intent",
    "amount": 2550,
    "currency": "usd",
    "status": "succeeded",
    "client_secret": "pi_3Nabc_secret_xyz",
    "created": 1700000000,
    "metadata": {"storeId": "1", "cartId": "cart_9", "items": "[]"},
    "shipping": {"name": "A", "address": {"postal_code": "SW1A 1AA", "country": "GB"}}
  }"#;

  #[test]
  fn parses_stripe_body_into_intent() {
    let intent = parse_payment_intent(SAMPLE).unwrap();
    assert_eq!(intent.id, "pi_3Nabc");
    assert!(intent.is_succeeded());
    assert_eq!(intent.shipping_postal_code.as_deref(), Some("SW1A 1AA"));
    assert_eq!(intent.store_id(), Some(1));
    assert_eq!(intent.cart_id(), Some("cart_9"));
    assert_eq!(intent.created.timestamp(), 1_700_000_000);
  }

  #[test]
  fn missing_shipping_and_metadata_are_tolerated() {
    let body = r#"{"id":"pi_1","amount":0,"currency":"usd","status":"processing","client_secret":null,"created":0}"#;
    let intent = parse_payment_intent(body).unwrap();
    assert!(intent.metadata.is_empty());
    assert!(intent.shipping_postal_code.is_none());
    assert!(!intent.is_succeeded());
  }

  #[test]
  fn intent_ids_must_be_a_single_safe_segment() {
    assert!(is_plausible_intent_id("pi_3Nabc123"));
    assert!(!is_plausible_intent_id(""));
    assert!(!is_plausible_intent_id("../customers"));
    assert!(!is_plausible_intent_id("pi_1?expand=x"));
  }
}
