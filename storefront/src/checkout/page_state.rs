// storefront/src/checkout/page_state.rs

use serde::Serialize;

/// Where the order-success page stands with respect to verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutSuccessState {
  #[default]
  AwaitingVerification,
  Verified,
  /// The page asks for the delivery postal code.
  Unverifiable,
}

impl CheckoutSuccessState {
  /// Only meaningful while awaiting verification; other states are kept.
  pub fn on_verification(self, is_verified: bool) -> Self {
    match self {
      CheckoutSuccessState::AwaitingVerification if is_verified => CheckoutSuccessState::Verified,
      CheckoutSuccessState::AwaitingVerification => CheckoutSuccessState::Unverifiable,
      other => other,
    }
  }

  pub fn on_postal_code_resubmitted(self) -> Self {
    match self {
      CheckoutSuccessState::Unverifiable => CheckoutSuccessState::AwaitingVerification,
      other => other,
    }
  }

  pub fn is_verified(self) -> bool {
    self == CheckoutSuccessState::Verified
  }
}
