// storefront-flow/src/core/control.rs

//! Flow-control signals returned by handlers and the outcome of a whole run.

/// Returned by every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  /// Keep going with the remaining handlers and steps.
  Continue,
  /// Halt the run. No further handler in this or any later step executes.
  Stop,
}

/// Outcome of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}
