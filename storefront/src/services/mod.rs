// storefront/src/services/mod.rs

//! Payment provider access.

pub mod payment_mock;
pub mod payment_provider;
pub mod stripe;

pub use payment_mock::MockPaymentProvider;
pub use payment_provider::PaymentProvider;
pub use stripe::StripePaymentProvider;

use crate::config::{AppConfig, PaymentProviderKind};
use crate::errors::{AppError, Result};
use std::sync::Arc;

/// Builds the provider selected by `PAYMENT_PROVIDER`.
pub fn build_payment_provider(config: &AppConfig) -> Result<Arc<dyn PaymentProvider>> {
  match config.payment_provider {
    PaymentProviderKind::Stripe => {
      let secret_key = config
        .stripe_secret_key
        .clone()
        .ok_or_else(|| AppError::Config("STRIPE_SECRET_KEY is not set".to_string()))?;
      let provider = StripePaymentProvider::new(stripe::StripeConfig {
        secret_key,
        api_base: config.stripe_api_base.clone(),
        timeout: config.payment_timeout,
      })?;
      Ok(Arc::new(provider))
    }
    PaymentProviderKind::Mock => {
      tracing::warn!("Using the in-memory mock payment provider; no real payments can be verified.");
      Ok(Arc::new(MockPaymentProvider::new()))
    }
  }
}
