// storefront/src/pipelines/order_success_pipeline.rs

use crate::checkout::{OrderSummary, VerificationRequest};
use crate::errors::AppError;
use crate::pipelines::contexts::CheckoutSuccessCtxData;
use futures_util::future::join;
use std::sync::Arc;
use storefront_flow::{ContextData, FlowRegistry, Pipeline, PipelineControl, SkipCondition};
use tracing::{event, info, warn, Level};

pub const LOAD_STORE_AND_VERIFY_PAYMENT: &str = "load_store_and_verify_payment";
pub const RESOLVE_ORDER_LINE_ITEMS: &str = "resolve_order_line_items";
pub const AGGREGATE_ORDER_SUMMARY: &str = "aggregate_order_summary";

fn unless_verified() -> SkipCondition<CheckoutSuccessCtxData> {
  Arc::new(|ctx_data: ContextData<CheckoutSuccessCtxData>| !ctx_data.read().state.is_verified())
}

/// Builds the order-success pipeline: verification gate, then line items and totals for verified orders.
pub fn order_success_pipeline() -> Pipeline<CheckoutSuccessCtxData, AppError> {
  let mut p = Pipeline::<CheckoutSuccessCtxData, AppError>::new(&[
    (LOAD_STORE_AND_VERIFY_PAYMENT, false, None),
    (RESOLVE_ORDER_LINE_ITEMS, false, Some(unless_verified())),
    (AGGREGATE_ORDER_SUMMARY, false, Some(unless_verified())),
  ]);

  // Step 1: store lookup and payment verification, concurrently.
  p.on_root(LOAD_STORE_AND_VERIFY_PAYMENT, |ctx_data: ContextData<CheckoutSuccessCtxData>| {
    Box::pin(async move {
      let (stores, gate, store_id, payment_intent_id, postal_code, cart_id) = {
        let guard = ctx_data.read();
        (
          guard.app_state.stores.clone(),
          guard.app_state.gate.clone(),
          guard.store_id,
          guard.query.payment_reference().to_string(),
          guard.query.delivery_postal_code().to_string(),
          guard.cart_id.clone(),
        )
      };

      let request = VerificationRequest {
        store_id,
        payment_intent_id: &payment_intent_id,
        delivery_postal_code: &postal_code,
        cart_id: cart_id.as_deref(),
      };
      let (store_result, verification) = join(stores.find_store(store_id), gate.verify(&request)).await;

      let store = store_result.unwrap_or_else(|e| {
        warn!(store_id, error = %e, "Store lookup failed; using the generic store label.");
        None
      });
      event!(Level::DEBUG, store_found = store.is_some(), is_verified = verification.is_verified(), "Gate finished.");

      let mut guard = ctx_data.write();
      guard.store = store;
      guard.verification = verification;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.after_root(LOAD_STORE_AND_VERIFY_PAYMENT, |ctx_data: ContextData<CheckoutSuccessCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let is_verified = guard.verification.is_verified();
      guard.state = guard.state.on_verification(is_verified);
      info!(store_id = guard.store_id, state = ?guard.state, "Order-success page state decided.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 2: line items from the verified intent's metadata.
  p.on_root(RESOLVE_ORDER_LINE_ITEMS, |ctx_data: ContextData<CheckoutSuccessCtxData>| {
    Box::pin(async move {
      let (resolver, store_id, items_payload) = {
        let guard = ctx_data.read();
        (
          guard.app_state.resolver.clone(),
          guard.store_id,
          guard
            .verification
            .payment_intent()
            .and_then(|intent| intent.items_metadata())
            .map(str::to_string),
        )
      };

      let line_items = resolver
        .resolve(store_id, items_payload.as_deref())
        .await
        .unwrap_or_else(|e| {
          warn!(store_id, error = %e, "Could not resolve order line items; showing none.");
          Vec::new()
        });

      ctx_data.write().line_items = line_items;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 3: totals.
  p.on_root(AGGREGATE_ORDER_SUMMARY, |ctx_data: ContextData<CheckoutSuccessCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      guard.summary = OrderSummary::from_line_items(&guard.line_items);
      event!(
        Level::DEBUG,
        total_quantity = guard.summary.total_quantity,
        total_price = %guard.summary.total_price,
        "Order summary computed."
      );
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p
}

pub fn register_order_success_pipeline(registry: &FlowRegistry<AppError>) {
  registry.register_pipeline(order_success_pipeline());
}
