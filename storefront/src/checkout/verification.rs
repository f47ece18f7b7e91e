// storefront/src/checkout/verification.rs

//! The order verification gate: decides whether the visitor of an order-success page
//! may see the order behind a payment reference.

use crate::db::StoreRepository;
use crate::errors::{AppError, Result};
use crate::models::payment::METADATA_STORE_ID;
use crate::models::{PaymentIntent, PaymentVerification};
use crate::services::PaymentProvider;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostalCodeMatching {
  /// Byte-for-byte comparison.
  Exact,
  /// Whitespace removed, ASCII case folded.
  Normalized,
}

impl std::str::FromStr for PostalCodeMatching {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "exact" => Ok(PostalCodeMatching::Exact),
      "normalized" => Ok(PostalCodeMatching::Normalized),
      other => Err(AppError::Config(format!("Unknown POSTAL_CODE_MATCHING '{}'", other))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationPolicy {
  /// When false, a succeeded intent is enough and the secondary factor is not checked.
  pub require_postal_code: bool,
  pub postal_code_matching: PostalCodeMatching,
}

impl Default for VerificationPolicy {
  fn default() -> Self {
    Self {
      require_postal_code: true,
      postal_code_matching: PostalCodeMatching::Normalized,
    }
  }
}

fn normalize_postal_code(code: &str) -> String {
  code
    .chars()
    .filter(|c| !c.is_whitespace())
    .map(|c| c.to_ascii_uppercase())
    .collect()
}

/// An empty supplied code never matches.
pub fn postal_codes_match(on_record: &str, supplied: &str, mode: PostalCodeMatching) -> bool {
  match mode {
    PostalCodeMatching::Exact => !supplied.is_empty() && on_record == supplied,
    PostalCodeMatching::Normalized => {
      let supplied = normalize_postal_code(supplied);
      !supplied.is_empty() && normalize_postal_code(on_record) == supplied
    }
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VerificationRequest<'a> {
  pub store_id: i32,
  pub payment_intent_id: &'a str,
  /// Possibly empty.
  pub delivery_postal_code: &'a str,
  /// Cart cookie of the visitor, if any.
  pub cart_id: Option<&'a str>,
}

/// Applies the policy to an intent the provider returned.
pub fn evaluate_intent(
  policy: &VerificationPolicy,
  request: &VerificationRequest<'_>,
  intent: PaymentIntent,
) -> PaymentVerification {
  if !intent.is_succeeded() {
    debug!(status = ?intent.status, "Intent has not succeeded.");
    return PaymentVerification::unverified();
  }
  if !intent.is_for_store(request.store_id) {
    warn!(
      intent_store = ?intent.metadata.get(METADATA_STORE_ID),
      requested_store = request.store_id,
      "Intent belongs to another store."
    );
    return PaymentVerification::unverified();
  }
  if !policy.require_postal_code {
    return PaymentVerification::verified(intent);
  }

  let cart_matches = match (request.cart_id.filter(|c| !c.is_empty()), intent.cart_id()) {
    (Some(visitor_cart), Some(intent_cart)) => visitor_cart == intent_cart,
    _ => false,
  };
  let postal_matches = intent
    .shipping_postal_code
    .as_deref()
    .map_or(false, |on_record| {
      postal_codes_match(on_record, request.delivery_postal_code, policy.postal_code_matching)
    });

  if cart_matches || postal_matches {
    PaymentVerification::verified(intent)
  } else {
    debug!(cart_matches, postal_matches, "Secondary factor did not match.");
    PaymentVerification::unverified()
  }
}

#[derive(Clone)]
pub struct OrderVerificationGate {
  payments: Arc<dyn PaymentProvider>,
  stores: Arc<dyn StoreRepository>,
  policy: VerificationPolicy,
}

impl OrderVerificationGate {
  pub fn new(payments: Arc<dyn PaymentProvider>, stores: Arc<dyn StoreRepository>, policy: VerificationPolicy) -> Self {
    Self {
      payments,
      stores,
      policy,
    }
  }

  pub fn policy(&self) -> &VerificationPolicy {
    &self.policy
  }

  /// Never fails: lookup and provider errors are logged and yield an unverified result.
  #[instrument(
    name = "checkout::verify_order",
    skip(self, request),
    fields(store_id = request.store_id, has_reference = !request.payment_intent_id.is_empty())
  )]
  pub async fn verify(&self, request: &VerificationRequest<'_>) -> PaymentVerification {
    match self.try_verify(request).await {
      Ok(verification) => {
        info!(is_verified = verification.is_verified(), "Order verification finished.");
        verification
      }
      Err(e) => {
        warn!(error = %e, "Order verification failed; treating order as unverified.");
        PaymentVerification::unverified()
      }
    }
  }

  async fn try_verify(&self, request: &VerificationRequest<'_>) -> Result<PaymentVerification> {
    let payment_intent_id = request.payment_intent_id.trim();
    if payment_intent_id.is_empty() {
      return Ok(PaymentVerification::unverified());
    }

    let connected_account = self
      .stores
      .find_store(request.store_id)
      .await?
      .and_then(|store| store.stripe_account_id);

    let intent = self
      .payments
      .retrieve_payment_intent(payment_intent_id, connected_account.as_deref())
      .await?;

    Ok(match intent {
      Some(intent) => evaluate_intent(&self.policy, request, intent),
      None => PaymentVerification::unverified(),
    })
  }
}
