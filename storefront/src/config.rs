// storefront/src/config.rs

use crate::checkout::summary::CurrencyFormat;
use crate::checkout::verification::{PostalCodeMatching, VerificationPolicy};
use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Which `PaymentProvider` implementation the server wires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentProviderKind {
  Stripe,
  /// In-memory provider for local development.
  Mock,
}

impl std::str::FromStr for PaymentProviderKind {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "stripe" => Ok(PaymentProviderKind::Stripe),
      "mock" => Ok(PaymentProviderKind::Mock),
      other => Err(AppError::Config(format!("Unknown PAYMENT_PROVIDER '{}'", other))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub app_base_url: String,

  pub payment_provider: PaymentProviderKind,
  /// Required when `payment_provider` is `Stripe`.
  pub stripe_secret_key: Option<String>,
  pub stripe_api_base: String,
  pub payment_timeout: Duration,

  pub verification: VerificationPolicy,
  pub currency: CurrencyFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from an arbitrary variable source.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| {
      lookup(var_name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };
    let or_default = |var_name: &str, default: &str| lookup(var_name).unwrap_or_else(|| default.to_string());

    let server_host = or_default("SERVER_HOST", "127.0.0.1");
    let server_port = or_default("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let app_base_url = lookup("APP_BASE_URL").unwrap_or_else(|| format!("http://{}:{}", server_host, server_port));

    let payment_provider = or_default("PAYMENT_PROVIDER", "stripe").parse::<PaymentProviderKind>()?;
    let stripe_secret_key = lookup("STRIPE_SECRET_KEY").filter(|k| !k.trim().is_empty());
    if payment_provider == PaymentProviderKind::Stripe && stripe_secret_key.is_none() {
      return Err(AppError::Config(
        "STRIPE_SECRET_KEY is required when PAYMENT_PROVIDER=stripe".to_string(),
      ));
    }
    let stripe_api_base = or_default("STRIPE_API_BASE", "https://api.stripe.com")
      .trim_end_matches('/')
      .to_string();
    let payment_timeout = or_default("PAYMENT_TIMEOUT_SECS", "10")
      .parse::<u64>()
      .map(Duration::from_secs)
      .map_err(|e| AppError::Config(format!("Invalid PAYMENT_TIMEOUT_SECS: {}", e)))?;

    let require_postal_code = or_default("REQUIRE_POSTAL_CODE", "true")
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid REQUIRE_POSTAL_CODE value: {}", e)))?;
    let postal_code_matching = or_default("POSTAL_CODE_MATCHING", "normalized").parse::<PostalCodeMatching>()?;
    let currency = CurrencyFormat::for_code(&or_default("STORE_CURRENCY", "USD"))?;

    tracing::info!(
      provider = ?payment_provider,
      require_postal_code,
      matching = ?postal_code_matching,
      currency = %currency.code,
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      app_base_url,
      payment_provider,
      stripe_secret_key,
      stripe_api_base,
      payment_timeout,
      verification: VerificationPolicy {
        require_postal_code,
        postal_code_matching,
      },
      currency,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| vars.get(name).cloned()
  }

  #[test]
  fn defaults_apply_for_mock_provider() {
    let cfg = AppConfig::from_lookup(lookup_from(&[
      ("DATABASE_URL", "postgres://localhost/storefront"),
      ("PAYMENT_PROVIDER", "mock"),
    ]))
    .unwrap();

    assert_eq!(cfg.server_port, 8080);
    assert_eq!(cfg.app_base_url, "http://127.0.0.1:8080");
    assert_eq!(cfg.payment_provider, PaymentProviderKind::Mock);
    assert!(cfg.verification.require_postal_code);
    assert_eq!(cfg.verification.postal_code_matching, PostalCodeMatching::Normalized);
    assert_eq!(cfg.currency.code, "USD");
    assert_eq!(cfg.payment_timeout, Duration::from_secs(10));
  }

  #[test]
  fn stripe_requires_a_secret_key() {
    let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/storefront")])).unwrap_err();
    assert!(matches!(err, AppError::Config(m) if m.contains("STRIPE_SECRET_KEY")));
  }

  #[test]
  fn missing_database_url_is_a_config_error() {
    let err = AppConfig::from_lookup(lookup_from(&[("PAYMENT_PROVIDER", "mock")])).unwrap_err();
    assert!(matches!(err, AppError::Config(m) if m.contains("DATABASE_URL")));
  }

  #[test]
  fn invalid_values_are_rejected() {
    let base = [("DATABASE_URL", "postgres://x"), ("PAYMENT_PROVIDER", "mock")];
    let with = |extra: (&'static str, &'static str)| {
      let mut pairs = base.to_vec();
      pairs.push(extra);
      AppConfig::from_lookup(lookup_from(&pairs))
    };
    assert!(with(("SERVER_PORT", "eighty")).is_err());
    assert!(with(("REQUIRE_POSTAL_CODE", "sometimes")).is_err());
    assert!(with(("POSTAL_CODE_MATCHING", "fuzzy")).is_err());
    assert!(with(("PAYMENT_PROVIDER", "paypal")).is_err());
  }

  #[test]
  fn stripe_settings_are_read() {
    let cfg = AppConfig::from_lookup(lookup_from(&[
      ("DATABASE_URL", "postgres://x"),
      ("STRIPE_SECRET_KEY", "sk_test_123"),
      ("STRIPE_API_BASE", "http://localhost:12111/"),
      ("PAYMENT_TIMEOUT_SECS", "3"),
      ("POSTAL_CODE_MATCHING", "exact"),
      ("STORE_CURRENCY", "eur"),
    ]))
    .unwrap();
    assert_eq!(cfg.payment_provider, PaymentProviderKind::Stripe);
    assert_eq!(cfg.stripe_secret_key.as_deref(), Some("sk_test_123"));
    assert_eq!(cfg.stripe_api_base, "http://localhost:12111");
    assert_eq!(cfg.payment_timeout, Duration::from_secs(3));
    assert_eq!(cfg.verification.postal_code_matching, PostalCodeMatching::Exact);
    assert_eq!(cfg.currency.code, "EUR");
  }
}
