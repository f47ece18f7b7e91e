// tests/pipeline_execution_tests.rs
mod common;

use common::*;
use serial_test::serial;
use std::sync::Arc;
use storefront_flow::{ContextData, FlowError, Pipeline, PipelineControl, PipelineResult};

#[tokio::test]
#[serial]
async fn steps_run_in_declared_order() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new(&[("load", false, None), ("resolve", false, None), ("summarize", false, None)]);

  pipeline.on_root("load", recording_handler("load", "L"));
  pipeline.on_root("resolve", recording_handler("resolve", "R"));
  pipeline.on_root("summarize", recording_handler("summarize", "S"));

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.trail, "LRS");
  assert_eq!(guard.steps_executed, vec!["load", "resolve", "summarize"]);
}

#[tokio::test]
#[serial]
async fn stop_signal_halts_remaining_steps() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new(&[("first", false, None), ("gate", false, None), ("never", false, None)]);

  pipeline.on_root("first", recording_handler("first", "1"));
  pipeline.on_root("gate", recording_handler("gate", "G"));
  pipeline.on_root("never", recording_handler("never", "N"));

  let ctx = ContextData::new(TestContext {
    should_stop_at: Some("gate".to_string()),
    ..Default::default()
  });
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Stopped);
  let guard = ctx.read();
  assert_eq!(guard.trail, "1G");
  assert_eq!(guard.steps_executed, vec!["first", "gate"]);
}

#[tokio::test]
#[serial]
async fn stop_in_before_phase_skips_on_and_after() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("guarded", false, None)]);

  pipeline.before_root("guarded", |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push("before".to_string());
      Ok::<_, FlowError>(PipelineControl::Stop)
    })
  });
  pipeline.on_root("guarded", recording_handler("on", "O"));
  pipeline.after_root("guarded", recording_handler("after", "A"));

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Stopped);
  assert_eq!(ctx.read().steps_executed, vec!["before"]);
}

#[tokio::test]
#[serial]
async fn handler_error_is_propagated_and_later_steps_do_not_run() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new(&[("ok", false, None), ("broken", false, None), ("later", false, None)]);

  pipeline.on_root("ok", recording_handler("ok", "K"));
  pipeline.on_root("broken", failing_handler("broken", "provider unreachable"));
  pipeline.on_root("later", recording_handler("later", "X"));

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap_err(), TestError::Handler("provider unreachable".to_string()));
  let guard = ctx.read();
  assert_eq!(guard.trail, "K");
  assert_eq!(guard.steps_executed, vec!["ok", "broken"]);
}

#[tokio::test]
#[serial]
async fn skip_condition_is_evaluated_against_live_context() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("verify", false, None),
    ("resolve_items", false, None),
    ("summarize", false, None),
  ]);

  let not_verified = Arc::new(|ctx: ContextData<TestContext>| !ctx.read().verified);
  pipeline.set_skip_condition("resolve_items", Some(not_verified.clone()));
  pipeline.set_skip_condition("summarize", Some(not_verified));

  pipeline.on_root("verify", recording_handler("verify", "V"));
  pipeline.on_root("resolve_items", recording_handler("resolve_items", "R"));
  pipeline.on_root("summarize", recording_handler("summarize", "S"));

  let unverified = ContextData::new(TestContext::default());
  assert_eq!(pipeline.run(unverified.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(unverified.read().steps_executed, vec!["verify"]);

  let verified = ContextData::new(TestContext {
    verified: true,
    ..Default::default()
  });
  assert_eq!(pipeline.run(verified.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(verified.read().steps_executed, vec!["verify", "resolve_items", "summarize"]);
}

#[tokio::test]
#[serial]
async fn skip_condition_sees_writes_from_earlier_steps() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("verify", false, None),
    (
      "resolve_items",
      false,
      Some(Arc::new(|ctx: ContextData<TestContext>| !ctx.read().verified)),
    ),
  ]);

  pipeline.on_root("verify", |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().verified = true;
      Ok::<_, FlowError>(PipelineControl::Continue)
    })
  });
  pipeline.on_root("resolve_items", recording_handler("resolve_items", "R"));

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().steps_executed, vec!["resolve_items"]);
}

#[tokio::test]
#[serial]
async fn optional_step_without_handlers_is_passed_over() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("optional_hook", true, None), ("main", false, None)]);
  pipeline.on_root("main", recording_handler("main", "M"));

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().steps_executed, vec!["main"]);
}

#[tokio::test]
#[serial]
async fn phases_run_before_on_after() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("main_step", false, None)]);

  pipeline.after_root("main_step", recording_handler("after_main", "After;"));
  pipeline.on_root("main_step", recording_handler("on_main", "On;"));
  pipeline.before_root("main_step", recording_handler("before_main", "Before;"));

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();

  let guard = ctx.read();
  assert_eq!(guard.trail, "Before;On;After;");
  assert_eq!(guard.steps_executed, vec!["before_main", "on_main", "after_main"]);
}

#[tokio::test]
#[serial]
#[should_panic(expected = "not found in pipeline definition")]
async fn registering_on_unknown_step_panics() {
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("known", false, None)]);
  pipeline.on_root("unknown", recording_handler("unknown", "?"));
}
