// storefront-flow/src/lib.rs

//! Named-step async pipelines for the storefront service.
//!
//! A request handler builds a context value, wraps it in [`ContextData`] and hands it
//! to the [`FlowRegistry`], which dispatches to the [`Pipeline`] registered for that
//! context type. Each pipeline is an ordered list of named steps; every step can carry
//! `before`, `on` and `after` handlers and an optional `skip_if` predicate evaluated
//! against the live context.
//!
//!  - Handlers are async and receive a clone of the shared context handle.
//!  - A handler can halt the run early with [`PipelineControl::Stop`].
//!  - Optional steps without handlers are passed over; required ones are an error.
//!  - The registry is keyed by context type, so one flow exists per context struct.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::FlowError;

pub use crate::registry::FlowRegistry;
