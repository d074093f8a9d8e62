//! In-memory fakes for every core port
//!
//! Deterministic stand-ins for the keychain, the HTTP endpoint, the platform
//! scheduler and the permission prompts.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use geosync_core::{
    Clock, CredentialStore, LocationPermissions, LocationPingSender, RateLimiter, SyncExecutor,
    TaskHandler, TaskScheduler,
};
use geosync_domain::constants::{KEY_AUTH_TOKEN, KEY_CURRENT_DAY_DATE, KEY_USER_ID};
use geosync_domain::{
    GeoSyncError, LocationSample, LocationTaskEvent, PermissionStatus, Result, SyncOutcome,
    SyncPayload, TrackingOptions,
};
use parking_lot::Mutex;

/// 2024-03-01T05:00:00Z, 10:30 IST
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 5, 0, 0).unwrap()
}

pub fn bangalore() -> LocationSample {
    LocationSample::new(12.9716, 77.5946, t0())
}

// ============================================================================
// Store
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_reads: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with user 42, a token and `currentDayDate=2024-03-01`.
    pub fn logged_in() -> Self {
        Self::new()
            .with(KEY_USER_ID, "42")
            .with(KEY_AUTH_TOKEN, "token-abc")
            .with(KEY_CURRENT_DAY_DATE, "2024-03-01")
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.values.lock().insert(key.to_string(), value.to_string());
        self
    }

    pub fn put(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    pub fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock() = fail;
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if *self.fail_reads.lock() {
            return Err(GeoSyncError::Storage("keychain locked".into()));
        }
        Ok(self.values.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().remove(key);
        Ok(())
    }
}

// ============================================================================
// Clock
// ============================================================================

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    local_offset: FixedOffset,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now), local_offset: FixedOffset::east_opt(0).unwrap() }
    }

    pub fn with_local_offset(mut self, seconds_east: i32) -> Self {
        self.local_offset = FixedOffset::east_opt(seconds_east).unwrap();
        self
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += chrono::Duration::from_std(by).unwrap();
    }

    pub fn rewind(&self, by: Duration) {
        let mut now = self.now.lock();
        *now -= chrono::Duration::from_std(by).unwrap();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    fn local_date(&self) -> NaiveDate {
        self.now().with_timezone(&self.local_offset).date_naive()
    }
}

// ============================================================================
// Sender
// ============================================================================

#[derive(Clone)]
pub enum SendBehavior {
    Succeed,
    Fail(GeoSyncError),
    Hang(Duration),
    Panic,
}

pub struct RecordingSender {
    behavior: Mutex<SendBehavior>,
    sent: Mutex<Vec<(SyncPayload, String)>>,
}

impl RecordingSender {
    pub fn new(behavior: SendBehavior) -> Self {
        Self { behavior: Mutex::new(behavior), sent: Mutex::new(Vec::new()) }
    }

    pub fn succeeding() -> Self {
        Self::new(SendBehavior::Succeed)
    }

    pub fn set_behavior(&self, behavior: SendBehavior) {
        *self.behavior.lock() = behavior;
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn sent(&self) -> Vec<(SyncPayload, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl LocationPingSender for RecordingSender {
    async fn send(&self, payload: &SyncPayload, auth_token: &str) -> Result<()> {
        self.sent.lock().push((payload.clone(), auth_token.to_string()));
        let behavior = self.behavior.lock().clone();
        match behavior {
            SendBehavior::Succeed => Ok(()),
            SendBehavior::Fail(err) => Err(err),
            SendBehavior::Hang(duration) => {
                tokio::time::sleep(duration).await;
                Ok(())
            }
            SendBehavior::Panic => panic!("sender exploded"),
        }
    }
}

// ============================================================================
// Scheduler
// ============================================================================

/// Scheduler that runs handlers synchronously when told to.
#[derive(Default)]
pub struct FakeScheduler {
    handlers: Mutex<HashMap<String, Arc<dyn TaskHandler>>>,
    running: Mutex<HashSet<String>>,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    fail_start: Mutex<bool>,
    last_options: Mutex<Option<TrackingOptions>>,
}

impl FakeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().len()
    }

    /// Deliver one event to the handler bound to `task_id`.
    pub async fn emit(&self, task_id: &str, event: LocationTaskEvent) -> Option<SyncOutcome> {
        let handler = self.handlers.lock().get(task_id).cloned()?;
        Some(handler.handle(event).await)
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    pub fn fail_start(&self, fail: bool) {
        *self.fail_start.lock() = fail;
    }

    /// Simulate the platform killing updates behind the app's back.
    pub fn force_stop(&self, task_id: &str) {
        self.running.lock().remove(task_id);
    }

    pub fn last_options(&self) -> Option<TrackingOptions> {
        self.last_options.lock().clone()
    }
}

#[async_trait]
impl TaskScheduler for FakeScheduler {
    fn define_task(&self, task_id: &str, handler: Arc<dyn TaskHandler>) {
        self.handlers.lock().insert(task_id.to_string(), handler);
    }

    fn is_task_defined(&self, task_id: &str) -> bool {
        self.handlers.lock().contains_key(task_id)
    }

    async fn start_location_updates(&self, task_id: &str, options: &TrackingOptions) -> Result<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_start.lock() {
            return Err(GeoSyncError::Internal("location service unavailable".into()));
        }
        *self.last_options.lock() = Some(options.clone());
        self.running.lock().insert(task_id.to_string());
        Ok(())
    }

    async fn stop_location_updates(&self, task_id: &str) -> Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.running.lock().remove(task_id);
        Ok(())
    }

    async fn has_started_location_updates(&self, task_id: &str) -> Result<bool> {
        Ok(self.running.lock().contains(task_id))
    }
}

// ============================================================================
// Permissions
// ============================================================================

pub struct FakePermissions {
    foreground: PermissionStatus,
    background: PermissionStatus,
}

impl FakePermissions {
    pub fn new(foreground: PermissionStatus, background: PermissionStatus) -> Self {
        Self { foreground, background }
    }

    pub fn granted() -> Self {
        Self::new(PermissionStatus::Granted, PermissionStatus::Granted)
    }
}

#[async_trait]
impl LocationPermissions for FakePermissions {
    async fn request_foreground(&self) -> Result<PermissionStatus> {
        Ok(self.foreground)
    }

    async fn request_background(&self) -> Result<PermissionStatus> {
        Ok(self.background)
    }
}

// ============================================================================
// Wiring
// ============================================================================

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub sender: Arc<RecordingSender>,
    pub clock: Arc<ManualClock>,
    pub limiter: Arc<RateLimiter>,
    pub executor: Arc<SyncExecutor>,
}

impl Harness {
    pub fn new(store: MemoryStore, sender: RecordingSender) -> Self {
        Self::with_clock(store, sender, ManualClock::at(t0()))
    }

    pub fn with_clock(store: MemoryStore, sender: RecordingSender, clock: ManualClock) -> Self {
        let store = Arc::new(store);
        let sender = Arc::new(sender);
        let clock = Arc::new(clock);
        let limiter = Arc::new(RateLimiter::default());
        let executor = Arc::new(SyncExecutor::new(
            store.clone(),
            sender.clone(),
            limiter.clone(),
            clock.clone(),
        ));
        Self { store, sender, clock, limiter, executor }
    }
}
