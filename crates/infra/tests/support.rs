//! Shared fixtures for infra integration tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use geosync_core::{Clock, TaskHandler};
use geosync_domain::constants::{KEY_AUTH_TOKEN, KEY_CURRENT_DAY_DATE, KEY_USER_ID};
use geosync_domain::{LocationTaskEvent, SyncOutcome};
use geosync_infra::MemoryStore;
use parking_lot::Mutex;
use tokio::sync::mpsc;

pub const TOKEN: &str = "tok-abc";

/// 2024-03-01T05:00:00Z, 10:30 IST
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 5, 0, 0).unwrap()
}

/// Store holding user 42, [`TOKEN`] and `currentDayDate=2024-03-01`.
pub fn logged_in_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_values([
        (KEY_USER_ID, "42"),
        (KEY_AUTH_TOKEN, TOKEN),
        (KEY_CURRENT_DAY_DATE, "2024-03-01"),
    ]))
}

/// Clock that only moves when told to.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self { now: Mutex::new(now) })
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Handler that forwards every event to a channel.
pub struct ChannelHandler {
    tx: mpsc::UnboundedSender<LocationTaskEvent>,
}

impl ChannelHandler {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<LocationTaskEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

#[async_trait]
impl TaskHandler for ChannelHandler {
    async fn handle(&self, event: LocationTaskEvent) -> SyncOutcome {
        let _ = self.tx.send(event);
        SyncOutcome::SkippedNoCredentials
    }
}

/// Handler that never finishes.
pub struct StuckHandler;

#[async_trait]
impl TaskHandler for StuckHandler {
    async fn handle(&self, _event: LocationTaskEvent) -> SyncOutcome {
        std::future::pending::<()>().await;
        SyncOutcome::SkippedNoCredentials
    }
}
