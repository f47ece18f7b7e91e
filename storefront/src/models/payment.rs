// storefront/src/models/payment.rs

use crate::errors::{AppError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata keys written on the intent when checkout creates it.
pub const METADATA_ITEMS: &str = "items";
pub const METADATA_CART_ID: &str = "cartId";
pub const METADATA_STORE_ID: &str = "storeId";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
  RequiresPaymentMethod,
  RequiresConfirmation,
  RequiresAction,
  Processing,
  RequiresCapture,
  Canceled,
  Succeeded,
  #[serde(other)]
  Unknown,
}

/// The payment provider's record of a charge, as far as the order-success flow needs it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentIntent {
  pub id: String,
  /// Minor currency units.
  pub amount: i64,
  pub currency: String,
  pub status: PaymentIntentStatus,
  #[serde(skip_serializing)]
  pub client_secret: Option<String>,
  #[serde(skip_serializing)]
  pub metadata: HashMap<String, String>,
  #[serde(skip_serializing)]
  pub shipping_postal_code: Option<String>,
  pub created: DateTime<Utc>,
}

impl PaymentIntent {
  pub fn is_succeeded(&self) -> bool {
    self.status == PaymentIntentStatus::Succeeded
  }

  /// Serialized checkout item list, if checkout stored one.
  pub fn items_metadata(&self) -> Option<&str> {
    self.metadata.get(METADATA_ITEMS).map(String::as_str)
  }

  pub fn cart_id(&self) -> Option<&str> {
    self.metadata.get(METADATA_CART_ID).map(String::as_str).filter(|s| !s.is_empty())
  }

  /// `None` when absent or not an integer.
  pub fn store_id(&self) -> Option<i32> {
    self.metadata.get(METADATA_STORE_ID).and_then(|s| s.trim().parse().ok())
  }

  /// True when the intent names `store_id` or no store at all. An unreadable `storeId` matches no store.
  pub fn is_for_store(&self, store_id: i32) -> bool {
    match self.metadata.get(METADATA_STORE_ID) {
      None => true,
      Some(_) => self.store_id() == Some(store_id),
    }
  }
}

/// One entry of the `items` metadata payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
  pub product_id: i32,
  pub quantity: i64,
  /// Price at purchase time, if checkout recorded it.
  #[serde(default)]
  pub price: Option<Decimal>,
}

impl CheckoutItem {
  pub fn parse_list(raw: &str) -> Result<Vec<CheckoutItem>> {
    serde_json::from_str(raw).map_err(|e| AppError::Metadata(format!("Could not parse checkout items: {}", e)))
  }
}

/// Outcome of the order verification gate.
///
/// An intent is only ever attached to a verified result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaymentVerification {
  payment_intent: Option<PaymentIntent>,
}

impl PaymentVerification {
  pub fn unverified() -> Self {
    Self { payment_intent: None }
  }

  pub fn verified(payment_intent: PaymentIntent) -> Self {
    Self {
      payment_intent: Some(payment_intent),
    }
  }

  pub fn is_verified(&self) -> bool {
    self.payment_intent.is_some()
  }

  pub fn payment_intent(&self) -> Option<&PaymentIntent> {
    self.payment_intent.as_ref()
  }
}
