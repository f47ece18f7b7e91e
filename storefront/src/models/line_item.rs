// storefront/src/models/line_item.rs

use crate::models::Product;
use rust_decimal::Decimal;
use serde::Serialize;

/// One purchased product on the order-success page.
///
/// Fields are private so `subtotal == price * quantity` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
  product_id: i32,
  name: String,
  price: Decimal,
  quantity: u32,
  subtotal: Decimal,
}

impl OrderLineItem {
  /// Returns `None` for a zero quantity.
  pub fn new(product_id: i32, name: impl Into<String>, price: Decimal, quantity: u32) -> Option<Self> {
    if quantity == 0 {
      return None;
    }
    Some(Self {
      product_id,
      name: name.into(),
      price,
      quantity,
      subtotal: price * Decimal::from(quantity),
    })
  }

  /// Line item priced at the product's current catalog price.
  pub fn from_product(product: &Product, quantity: u32) -> Option<Self> {
    Self::new(product.id, product.name.clone(), product.price, quantity)
  }

  pub fn product_id(&self) -> i32 {
    self.product_id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn price(&self) -> Decimal {
    self.price
  }

  pub fn quantity(&self) -> u32 {
    self.quantity
  }

  pub fn subtotal(&self) -> Decimal {
    self.subtotal
  }
}
