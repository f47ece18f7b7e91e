// storefront/src/models/store.rs

use serde::Serialize;
use sqlx::FromRow;

/// Label shown when the store cannot be found.
pub const FALLBACK_STORE_NAME: &str = "Store";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Store {
  pub id: i32,
  pub name: String,
  /// Connected payment account the store's intents are created under.
  #[serde(skip_serializing)]
  pub stripe_account_id: Option<String>,
}

/// Display name for an optional store lookup result.
pub fn display_name(store: Option<&Store>) -> &str {
  store.map_or(FALLBACK_STORE_NAME, |s| s.name.as_str())
}
