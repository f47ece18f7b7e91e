// storefront/src/state.rs

use crate::checkout::{LineItemResolver, OrderVerificationGate};
use crate::config::AppConfig;
use crate::db::StoreRepository;
use crate::errors::AppError;
use crate::pipelines;
use crate::services::PaymentProvider;
use std::sync::Arc;
use storefront_flow::FlowRegistry;

#[derive(Clone)]
pub struct AppState {
  pub registry: Arc<FlowRegistry<AppError>>,
  pub config: Arc<AppConfig>,
  pub stores: Arc<dyn StoreRepository>,
  pub gate: OrderVerificationGate,
  pub resolver: LineItemResolver,
}

impl AppState {
  /// Wires the checkout services over the given backends and registers every pipeline.
  pub fn new(config: Arc<AppConfig>, stores: Arc<dyn StoreRepository>, payments: Arc<dyn PaymentProvider>) -> Self {
    let registry = Arc::new(FlowRegistry::<AppError>::new());
    pipelines::register_all_pipelines(&registry);

    Self {
      gate: OrderVerificationGate::new(payments, stores.clone(), config.verification),
      resolver: LineItemResolver::new(stores.clone()),
      registry,
      config,
      stores,
    }
  }
}
