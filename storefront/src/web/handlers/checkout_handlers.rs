// storefront/src/web/handlers/checkout_handlers.rs

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::checkout::{CheckoutSuccessState, SuccessPageQuery};
use crate::errors::AppError;
use crate::models::payment::METADATA_CART_ID;
use crate::models::{store, OrderLineItem};
use crate::pipelines::contexts::CheckoutSuccessCtxData;
use crate::state::AppState;
use storefront_flow::{ContextData, PipelineResult};

const HEADING: &str = "Thank you for your order";
const VERIFY_PROMPT: &str = "Please enter your delivery postal code to verify your order";

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PageAction {
  pub label: &'static str,
  pub href: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
  pub total_quantity: u64,
  pub total_price: String,
  /// `total_price` in the store currency, e.g. `$25.50`.
  pub total_price_display: String,
  pub currency: String,
}

/// JSON view model of the order-success page.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OrderSuccessView {
  pub store_id: i32,
  pub store_name: String,
  pub state: CheckoutSuccessState,
  pub is_verified: bool,
  pub heading: &'static str,
  pub description: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub payment_intent_id: Option<String>,
  pub line_items: Vec<OrderLineItem>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub totals: Option<OrderTotals>,
  pub actions: Vec<PageAction>,
}

#[derive(Deserialize, Debug)]
pub struct VerifyOrderForm {
  #[serde(default)]
  pub delivery_postal_code: String,
}

fn success_path(store_id: i32) -> String {
  format!("/checkout/{}/success", store_id)
}

/// Form action of the verify-order form. Keeps the payment parameters so the redirect can carry them back.
fn verify_action_href(store_id: i32, query: &SuccessPageQuery) -> String {
  let carried = query.carried_query();
  if carried.is_empty() {
    format!("{}/verify", success_path(store_id))
  } else {
    format!("{}/verify?{}", success_path(store_id), carried)
  }
}

fn build_view(ctx: &CheckoutSuccessCtxData) -> OrderSuccessView {
  let store_name = store::display_name(ctx.store.as_ref()).to_string();
  let is_verified = ctx.state.is_verified();

  if !is_verified {
    return OrderSuccessView {
      store_id: ctx.store_id,
      store_name,
      state: ctx.state,
      is_verified,
      heading: HEADING,
      description: VERIFY_PROMPT.to_string(),
      payment_intent_id: None,
      line_items: Vec::new(),
      totals: None,
      actions: vec![PageAction {
        label: "Verify order",
        href: verify_action_href(ctx.store_id, &ctx.query),
      }],
    };
  }

  let currency = &ctx.app_state.config.currency;
  OrderSuccessView {
    store_id: ctx.store_id,
    description: format!("{} will be in touch with you shortly", store_name),
    store_name,
    state: ctx.state,
    is_verified,
    heading: HEADING,
    payment_intent_id: ctx.verification.payment_intent().map(|intent| intent.id.clone()),
    line_items: ctx.line_items.clone(),
    totals: Some(OrderTotals {
      total_quantity: ctx.summary.total_quantity,
      total_price: ctx.summary.total_price.to_string(),
      total_price_display: currency.format(ctx.summary.total_price),
      currency: currency.code.clone(),
    }),
    actions: vec![
      PageAction {
        label: "Continue shopping",
        href: "/products".to_string(),
      },
      PageAction {
        label: "Back to cart",
        href: "/cart".to_string(),
      },
    ],
  }
}

#[instrument(name = "handler::order_success", skip(app_state, req), fields(store_id = %store_id))]
pub async fn order_success_handler(
  app_state: web::Data<AppState>,
  store_id: web::Path<i32>,
  req: HttpRequest,
) -> Result<HttpResponse, AppError> {
  let store_id = store_id.into_inner();
  let query = SuccessPageQuery::parse(req.query_string());
  let cart_id = req.cookie(METADATA_CART_ID).map(|c| c.value().to_string());

  let ctx_data = ContextData::new(CheckoutSuccessCtxData::new(
    app_state.get_ref().clone(),
    store_id,
    query,
    cart_id,
  ));

  match app_state.registry.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let view = build_view(&ctx_data.read());
      info!(is_verified = view.is_verified, items = view.line_items.len(), "Order-success page served.");
      Ok(HttpResponse::Ok().json(view))
    }
    PipelineResult::Stopped => {
      warn!("Order-success pipeline stopped before completion.");
      Err(AppError::Internal("Order-success flow stopped unexpectedly.".to_string()))
    }
  }
}

/// Form action of the verify-order form: sends the visitor back to the success page with the code.
#[instrument(name = "handler::verify_order", skip(app_state, req, form), fields(store_id = %store_id))]
pub async fn verify_order_handler(
  app_state: web::Data<AppState>,
  store_id: web::Path<i32>,
  req: HttpRequest,
  form: web::Form<VerifyOrderForm>,
) -> Result<HttpResponse, AppError> {
  let postal_code = form.delivery_postal_code.trim();
  if postal_code.is_empty() {
    return Err(AppError::Validation("Delivery postal code is required.".to_string()));
  }

  let query = SuccessPageQuery::parse(req.query_string());
  let location = format!(
    "{}{}?{}",
    app_state.config.app_base_url,
    success_path(store_id.into_inner()),
    query.with_postal_code(postal_code)
  );
  info!("Redirecting to the order-success page for re-verification.");
  Ok(HttpResponse::SeeOther().insert_header((header::LOCATION, location)).finish())
}
