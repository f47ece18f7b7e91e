// storefront/src/pipelines/contexts.rs

//! Data structs the pipelines run over, wrapped in `storefront_flow::ContextData`.

use crate::checkout::{CheckoutSuccessState, OrderSummary, SuccessPageQuery};
use crate::models::{OrderLineItem, PaymentVerification, Store};
use crate::state::AppState;

#[derive(Clone)]
pub struct CheckoutSuccessCtxData {
  pub app_state: AppState,
  pub store_id: i32,
  pub query: SuccessPageQuery,
  /// Value of the visitor's `cartId` cookie.
  pub cart_id: Option<String>,

  // Populated by the pipeline:
  pub store: Option<Store>,
  pub verification: PaymentVerification,
  pub state: CheckoutSuccessState,
  pub line_items: Vec<OrderLineItem>,
  pub summary: OrderSummary,
}

impl CheckoutSuccessCtxData {
  pub fn new(app_state: AppState, store_id: i32, query: SuccessPageQuery, cart_id: Option<String>) -> Self {
    // A postal code on the query means the visitor came back through the verify form.
    let state = if query.delivery_postal_code().is_empty() {
      CheckoutSuccessState::default()
    } else {
      CheckoutSuccessState::Unverifiable.on_postal_code_resubmitted()
    };

    Self {
      app_state,
      store_id,
      query,
      cart_id,
      store: None,
      verification: PaymentVerification::unverified(),
      state,
      line_items: Vec::new(),
      summary: OrderSummary::default(),
    }
  }
}
