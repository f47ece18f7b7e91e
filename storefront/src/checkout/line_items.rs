// storefront/src/checkout/line_items.rs

use crate::db::StoreRepository;
use crate::errors::Result;
use crate::models::{CheckoutItem, OrderLineItem};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Turns the `items` metadata of a verified intent into catalog-backed line items.
#[derive(Clone)]
pub struct LineItemResolver {
  stores: Arc<dyn StoreRepository>,
}

/// Merges repeated product ids, keeping first-seen order. Non-positive quantities are dropped.
fn merge_quantities(items: &[CheckoutItem]) -> Vec<(CheckoutItem, u32)> {
  let mut merged: Vec<(CheckoutItem, u32)> = Vec::new();
  let mut position: HashMap<i32, usize> = HashMap::new();

  for item in items.iter().filter(|i| i.quantity > 0) {
    let quantity = u32::try_from(item.quantity).unwrap_or(u32::MAX);
    match position.get(&item.product_id) {
      Some(&idx) => merged[idx].1 = merged[idx].1.saturating_add(quantity),
      None => {
        position.insert(item.product_id, merged.len());
        merged.push((item.clone(), quantity));
      }
    }
  }
  merged
}

impl LineItemResolver {
  pub fn new(stores: Arc<dyn StoreRepository>) -> Self {
    Self { stores }
  }

  /// Only call this for a verified order. A missing payload resolves to no items.
  #[instrument(name = "checkout::resolve_line_items", skip(self, items_payload), fields(has_payload = items_payload.is_some()))]
  pub async fn resolve(&self, store_id: i32, items_payload: Option<&str>) -> Result<Vec<OrderLineItem>> {
    let Some(raw) = items_payload.filter(|raw| !raw.trim().is_empty()) else {
      return Ok(Vec::new());
    };
    let checkout_items = CheckoutItem::parse_list(raw)?;
    let merged = merge_quantities(&checkout_items);
    if merged.is_empty() {
      return Ok(Vec::new());
    }

    let product_ids: Vec<i32> = merged.iter().map(|(item, _)| item.product_id).collect();
    let products: HashMap<i32, _> = self
      .stores
      .find_products(store_id, &product_ids)
      .await?
      .into_iter()
      .filter(|p| p.store_id == store_id)
      .map(|p| (p.id, p))
      .collect();

    let line_items: Vec<OrderLineItem> = merged
      .iter()
      .filter_map(|(item, quantity)| {
        let Some(product) = products.get(&item.product_id) else {
          debug!(product_id = item.product_id, "Purchased product is no longer in the catalog.");
          return None;
        };
        if let Some(paid) = item.price.filter(|paid| *paid != product.price) {
          debug!(
            product_id = product.id,
            paid = %paid,
            current = %product.price,
            "Catalog price differs from the price paid."
          );
        }
        OrderLineItem::from_product(product, *quantity)
      })
      .collect();

    debug!(resolved = line_items.len(), requested = merged.len(), "Line items resolved.");
    Ok(line_items)
  }
}
