// storefront-flow/src/pipeline/hooks.rs

//! Registration of `before`, `on` and `after` handlers.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;
use std::collections::HashMap;
use std::future::Future;
use tracing::{event, Level};

fn boxed_handler<TData, Err, F, HandlerErr>(
  handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
  HandlerErr: Into<Err> + Send + Sync + 'static,
{
  Box::new(move |ctx_data| {
    let fut = handler_fn(ctx_data);
    Box::pin(async move { fut.await.map_err(Into::into) })
  })
}

fn push_handler<TData: 'static + Send + Sync, Err>(
  phase: &mut HashMap<String, Vec<Handler<TData, Err>>>,
  step_name: &str,
  handler: Handler<TData, Err>,
) {
  phase.entry(step_name.to_string()).or_default().push(handler);
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Registers a handler that runs before the step's `on` handlers.
  ///
  /// The handler may fail with any error convertible into the pipeline's `Err`.
  pub fn before_root<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    push_handler(&mut self.before, step_name, boxed_handler(handler_fn));
    event!(Level::TRACE, %step_name, "'before' handler registered.");
  }

  pub fn on_root<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    push_handler(&mut self.on, step_name, boxed_handler(handler_fn));
    event!(Level::TRACE, %step_name, "'on' handler registered.");
  }

  pub fn after_root<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    push_handler(&mut self.after, step_name, boxed_handler(handler_fn));
    event!(Level::TRACE, %step_name, "'after' handler registered.");
  }
}
