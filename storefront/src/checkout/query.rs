// storefront/src/checkout/query.rs

use std::collections::HashMap;

pub const PAYMENT_INTENT: &str = "payment_intent";
pub const PAYMENT_INTENT_CLIENT_SECRET: &str = "payment_intent_client_secret";
pub const REDIRECT_STATUS: &str = "redirect_status";
pub const DELIVERY_POSTAL_CODE: &str = "delivery_postal_code";

/// Query parameters the payment provider's redirect (and the verify form) put on the success page.
///
/// A key that appears more than once is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuccessPageQuery {
  pub payment_intent: Option<String>,
  pub payment_intent_client_secret: Option<String>,
  pub redirect_status: Option<String>,
  pub delivery_postal_code: Option<String>,
}

impl SuccessPageQuery {
  /// Unparsable input yields an empty query.
  pub fn parse(raw: &str) -> Self {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw).unwrap_or_default();
    let mut seen: HashMap<String, Option<String>> = HashMap::new();
    for (key, value) in pairs {
      seen
        .entry(key)
        .and_modify(|slot| *slot = None)
        .or_insert(Some(value));
    }
    let mut take = |key: &str| seen.remove(key).flatten();

    Self {
      payment_intent: take(PAYMENT_INTENT),
      payment_intent_client_secret: take(PAYMENT_INTENT_CLIENT_SECRET),
      redirect_status: take(REDIRECT_STATUS),
      delivery_postal_code: take(DELIVERY_POSTAL_CODE),
    }
  }

  /// Empty when the parameter is missing.
  pub fn payment_reference(&self) -> &str {
    self.payment_intent.as_deref().unwrap_or_default()
  }

  pub fn delivery_postal_code(&self) -> &str {
    self.delivery_postal_code.as_deref().unwrap_or_default()
  }

  fn carried_pairs(&self) -> Vec<(&'static str, &str)> {
    [
      (PAYMENT_INTENT, &self.payment_intent),
      (PAYMENT_INTENT_CLIENT_SECRET, &self.payment_intent_client_secret),
      (REDIRECT_STATUS, &self.redirect_status),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.as_deref().map(|value| (key, value)))
    .collect()
  }

  /// The provider's redirect parameters without any postal code, encoded. Empty when none are set.
  pub fn carried_query(&self) -> String {
    // Encoding a flat list of string pairs cannot fail.
    serde_urlencoded::to_string(self.carried_pairs()).unwrap_or_default()
  }

  /// Same query with the postal code replaced, encoded for a redirect.
  pub fn with_postal_code(&self, postal_code: &str) -> String {
    let mut pairs = self.carried_pairs();
    pairs.push((DELIVERY_POSTAL_CODE, postal_code));
    serde_urlencoded::to_string(&pairs).unwrap_or_default()
  }
}
