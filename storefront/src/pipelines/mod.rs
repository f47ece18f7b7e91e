// storefront/src/pipelines/mod.rs

//! Defines and registers the flow pipelines used by the storefront.

use crate::errors::AppError;
use storefront_flow::FlowRegistry;

pub mod contexts;
pub mod order_success_pipeline;

/// Called once at startup.
pub fn register_all_pipelines(registry: &FlowRegistry<AppError>) {
  tracing::info!("Registering storefront pipelines...");

  order_success_pipeline::register_order_success_pipeline(registry);

  tracing::info!("All storefront pipelines registered.");
}
