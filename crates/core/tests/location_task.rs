//! Task handler boundary and registration.

mod support;

use std::sync::Arc;

use chrono::Duration as ChronoDuration;
use geosync_core::{define_location_task, LocationTask, TaskHandler, TaskScheduler};
use geosync_domain::constants::{KEY_LAST_BACKGROUND_SAVE, LOCATION_TASK_ID};
use geosync_domain::{FailureReason, LocationSample, LocationTaskEvent, SyncOutcome};
use support::{bangalore, t0, FakeScheduler, Harness, MemoryStore, RecordingSender, SendBehavior};

fn task(h: &Harness) -> Arc<LocationTask> {
    Arc::new(LocationTask::new(h.executor.clone()))
}

#[tokio::test]
async fn repeated_definition_keeps_one_handler() {
    let h = Harness::new(MemoryStore::logged_in(), RecordingSender::succeeding());
    let scheduler = FakeScheduler::new();

    define_location_task(&scheduler, LOCATION_TASK_ID, task(&h));
    define_location_task(&scheduler, LOCATION_TASK_ID, task(&h));

    assert_eq!(scheduler.handler_count(), 1);
    assert!(scheduler.is_task_defined(LOCATION_TASK_ID));

    let outcome = scheduler
        .emit(LOCATION_TASK_ID, LocationTaskEvent::single(bangalore()))
        .await
        .expect("handler bound");
    assert!(outcome.is_success());
    assert_eq!(h.sender.calls(), 1);
}

#[tokio::test]
async fn provider_error_has_no_side_effects() {
    let h = Harness::new(MemoryStore::logged_in(), RecordingSender::succeeding());

    let outcome = task(&h).handle(LocationTaskEvent::Error("GPS disabled".into())).await;

    assert_eq!(outcome, SyncOutcome::Failed(FailureReason::Provider("GPS disabled".into())));
    assert_eq!(h.sender.calls(), 0);
    assert!(h.store.value(KEY_LAST_BACKGROUND_SAVE).is_none());
    assert_eq!(h.limiter.last_save_ms(), 0);
}

#[tokio::test]
async fn empty_batch_is_reported() {
    let h = Harness::new(MemoryStore::logged_in(), RecordingSender::succeeding());

    let outcome = task(&h).handle(LocationTaskEvent::Locations(Vec::new())).await;

    assert_eq!(outcome, SyncOutcome::Failed(FailureReason::NoLocation));
    assert_eq!(h.sender.calls(), 0);
}

#[tokio::test]
async fn only_first_sample_is_used() {
    let h = Harness::new(MemoryStore::logged_in(), RecordingSender::succeeding());
    let later = LocationSample::new(13.0827, 80.2707, t0() + ChronoDuration::seconds(5));

    task(&h).handle(LocationTaskEvent::Locations(vec![bangalore(), later])).await;

    let sent = h.sender.sent();
    assert_eq!(sent.len(), 1);
    assert!((sent[0].0.latitude - 12.9716).abs() < f64::EPSILON);
}

#[tokio::test]
async fn panic_inside_executor_is_contained() {
    let h = Harness::new(MemoryStore::logged_in(), RecordingSender::new(SendBehavior::Panic));

    let outcome = task(&h).handle(LocationTaskEvent::single(bangalore())).await;

    match outcome {
        SyncOutcome::Failed(FailureReason::Internal(msg)) => assert!(msg.contains("sender exploded")),
        other => panic!("expected contained panic, got {other:?}"),
    }
    assert_eq!(h.limiter.last_save_ms(), 0);
}
