// storefront-flow/src/registry.rs

//! `FlowRegistry<E>`: pipelines keyed by their context data type.
//! Registered pipelines may use their own handler error type as long as the
//! registry's application error `E` can be built from it.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineResult;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

#[async_trait]
trait ErasedPipelineRunner<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  /// `ctx_obj` holds a `ContextData<TData>` for the wrapped pipeline's `TData`.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr>;
}

struct PipelineRunner<TData, HandlerErr, AppErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pipeline: Arc<Pipeline<TData, HandlerErr>>,
  _phantom_app_err: PhantomData<fn() -> AppErr>,
}

#[async_trait]
impl<TData, HandlerErr, AppErr> ErasedPipelineRunner<AppErr> for PipelineRunner<TData, HandlerErr, AppErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<HandlerErr> + From<FlowError> + Send + Sync + 'static,
{
  #[instrument(
    name = "PipelineRunner::run_erased",
    skip_all,
    fields(target_tdata_type = %std::any::type_name::<TData>()),
    err(Display)
  )]
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr> {
    let typed_ctx_data = match ctx_obj.downcast::<ContextData<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected_type = std::any::type_name::<ContextData<TData>>().to_string();
        event!(Level::ERROR, %expected_type, "Context object type mismatch.");
        return Err(AppErr::from(FlowError::TypeMismatch { expected_type }));
      }
    };
    self.pipeline.run(typed_ctx_data).await.map_err(AppErr::from)
  }
}

/// Registry of pipelines, one per context data type.
///
/// `AppErr` is what `run` returns; it absorbs both the flow's own errors and every
/// registered pipeline's handler error.
pub struct FlowRegistry<AppErr = FlowError>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  registry: RwLock<HashMap<TypeId, Arc<dyn ErasedPipelineRunner<AppErr>>>>,
}

impl<AppErr> FlowRegistry<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      registry: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `pipeline` for its context data type, replacing any earlier one.
  pub fn register_pipeline<TData, HandlerErr>(&self, pipeline: Pipeline<TData, HandlerErr>)
  where
    TData: 'static + Send + Sync,
    HandlerErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
    AppErr: From<HandlerErr>,
  {
    event!(
      Level::DEBUG,
      tdata_type = %std::any::type_name::<TData>(),
      steps = ?pipeline.step_names(),
      "Registering pipeline."
    );
    let runner = PipelineRunner::<TData, HandlerErr, AppErr> {
      pipeline: Arc::new(pipeline),
      _phantom_app_err: PhantomData,
    };
    self.registry.write().insert(TypeId::of::<TData>(), Arc::new(runner));
  }

  pub fn is_registered<TData: 'static>(&self) -> bool {
    self.registry.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the pipeline registered for `TData` over `ctx_data`.
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, AppErr>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self
      .registry
      .read()
      .get(&TypeId::of::<TData>())
      .cloned()
      .ok_or_else(|| {
        let context_type = std::any::type_name::<TData>().to_string();
        event!(Level::ERROR, %context_type, "No pipeline registered for context type.");
        AppErr::from(FlowError::PipelineNotRegistered { context_type })
      })?;

    runner.run_erased(Box::new(ctx_data)).await
  }
}

impl<AppErr> Default for FlowRegistry<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
