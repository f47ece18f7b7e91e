// storefront-flow/src/pipeline/execution.rs

//! `Pipeline::run()`: walks the steps in order and drives each handler phase.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, span, Instrument, Level};

/// Result of driving one phase (`before`, `on` or `after`) of a step.
enum PhaseOutcome {
  Continue,
  Stopped,
}

async fn run_phase<TData, Err>(
  phase: &'static str,
  handlers: &[Handler<TData, Err>],
  ctx_data: &ContextData<TData>,
) -> Result<PhaseOutcome, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + Send + Sync + 'static,
{
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    let handler_span = span!(Level::DEBUG, "phase_handler", phase, handler_index = handler_idx);
    match handler_fn(ctx_data.clone()).instrument(handler_span).await {
      Ok(PipelineControl::Continue) => {}
      Ok(PipelineControl::Stop) => {
        event!(Level::INFO, phase, "Pipeline stopped by a handler.");
        return Ok(PhaseOutcome::Stopped);
      }
      Err(e) => {
        event!(Level::ERROR, phase, error = %e, "Handler failed.");
        return Err(e);
      }
    }
  }
  Ok(PhaseOutcome::Continue)
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Executes every step against `ctx_data`.
  ///
  /// A step whose `skip_if` holds is passed over. A step without any handler is passed
  /// over when optional and fails the run with `FlowError::HandlerMissing` otherwise.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      pipeline_context_data_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = span!(
        Level::INFO,
        "pipeline_step",
        step_name,
        step_index = step_idx,
        optional = step_def.optional
      );

      if let Some(skip_cond_fn) = &step_def.skip_if {
        if skip_cond_fn(ctx_data.clone()) {
          event!(parent: &step_span, Level::INFO, "Step skipped by its 'skip_if' condition.");
          continue;
        }
      }

      let phases = [
        ("before", self.before.get(step_name)),
        ("on", self.on.get(step_name)),
        ("after", self.after.get(step_name)),
      ];

      let has_handlers = phases
        .iter()
        .any(|(_, handlers)| handlers.map_or(false, |v| !v.is_empty()));
      if !has_handlers {
        if step_def.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Non-optional step has no handlers.");
        return Err(Err::from(FlowError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      for (phase, handlers) in phases {
        let Some(handlers) = handlers else { continue };
        let outcome = run_phase(phase, handlers, &ctx_data)
          .instrument(step_span.clone())
          .await?;
        if let PhaseOutcome::Stopped = outcome {
          return Ok(PipelineResult::Stopped);
        }
      }
      event!(parent: &step_span, Level::DEBUG, "Step finished.");
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }
}
