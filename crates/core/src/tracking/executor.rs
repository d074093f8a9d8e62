//! Sync executor - turns one location sample into a remote record.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use geosync_domain::constants::SYNC_REQUEST_TIMEOUT;
use geosync_domain::{
    Credentials, FailureReason, GeoSyncError, LastSaveRecord, LocationSample, Result,
    SyncOutcome, SyncPayload,
};
use tracing::{debug, info, instrument, warn};

use super::limiter::RateLimiter;
use super::ports::{Clock, CredentialStore, LocationPingSender};
use super::store;
use super::timefmt::{format_day, ist_timestamp};

/// Executes one sync attempt per call.
///
/// Credentials are re-read from the store every time so token rotation and
/// logout take effect on the next tick.
pub struct SyncExecutor {
    store: Arc<dyn CredentialStore>,
    sender: Arc<dyn LocationPingSender>,
    limiter: Arc<RateLimiter>,
    clock: Arc<dyn Clock>,
    request_timeout: Duration,
}

impl SyncExecutor {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        sender: Arc<dyn LocationPingSender>,
        limiter: Arc<RateLimiter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, sender, limiter, clock, request_timeout: SYNC_REQUEST_TIMEOUT }
    }

    /// Override the request deadline (default 8s).
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Run the rate-limit check, then sync `sample`.
    ///
    /// Only a confirmed 2xx advances the limiter and overwrites the
    /// last-save record.
    #[instrument(skip(self, sample))]
    pub async fn sync(&self, sample: &LocationSample) -> SyncOutcome {
        let now = self.clock.now();
        let now_ms = now.timestamp_millis();

        if !self.limiter.try_acquire(now_ms) {
            let elapsed_ms = self.limiter.elapsed(now_ms);
            debug!(elapsed_ms, "Skipping sync, minimum interval not reached");
            return SyncOutcome::SkippedRateLimit { elapsed_ms };
        }

        let credentials = match store::read_credentials(self.store.as_ref()).await {
            Ok(Some(credentials)) => credentials,
            Ok(None) => {
                warn!("Skipping sync, no user id or auth token in storage");
                return SyncOutcome::SkippedNoCredentials;
            }
            Err(err) => {
                warn!(error = %err, "Skipping sync, credential store unavailable");
                return SyncOutcome::Failed(FailureReason::Storage(err.to_string()));
            }
        };

        let payload = match self.build_payload(&credentials, sample, now) {
            Ok(payload) => payload,
            Err(reason) => return SyncOutcome::Failed(reason),
        };

        debug!(user_id = payload.user_id, day = %payload.day, "Posting location ping");

        let request = self.sender.send(&payload, &credentials.auth_token);
        let sent = tokio::time::timeout(self.request_timeout, request)
            .await
            .unwrap_or_else(|_| Err(GeoSyncError::timeout(self.request_timeout)));

        if let Err(err) = sent {
            warn!(error = %err, "Location sync failed");
            return SyncOutcome::Failed(failure_reason(err));
        }

        self.limiter.record_success(now_ms);

        let record = LastSaveRecord::from(&payload);
        if let Err(err) = store::save_last_save(self.store.as_ref(), &record).await {
            warn!(error = %err, "Location synced but last-save record was not persisted");
        }

        info!(timestamp = %record.timestamp, "Location synced");
        SyncOutcome::Success(record)
    }

    /// Last persisted success, if any.
    pub async fn last_save_record(&self) -> Result<Option<LastSaveRecord>> {
        store::load_last_save(self.store.as_ref()).await
    }

    fn build_payload(
        &self,
        credentials: &Credentials,
        sample: &LocationSample,
        now: DateTime<Utc>,
    ) -> std::result::Result<SyncPayload, FailureReason> {
        let user_id = credentials.user_id.trim().parse::<i64>().map_err(|_| {
            warn!(user_id = %credentials.user_id, "Stored user id is not numeric");
            FailureReason::InvalidUserId(credentials.user_id.clone())
        })?;

        let day = match &credentials.current_day_date {
            Some(day) => day.clone(),
            None => {
                let derived = format_day(self.clock.local_date());
                debug!(day = %derived, "No currentDayDate stored, using device date");
                derived
            }
        };

        Ok(SyncPayload {
            user_id,
            day,
            latitude: sample.latitude,
            longitude: sample.longitude,
            timestamp: ist_timestamp(now),
            is_background: true,
        })
    }
}

fn failure_reason(err: GeoSyncError) -> FailureReason {
    match err {
        GeoSyncError::Timeout { .. } => FailureReason::Timeout,
        GeoSyncError::Http { status, .. } => FailureReason::Http(status),
        GeoSyncError::Network(msg) => FailureReason::Network(msg),
        GeoSyncError::Storage(msg) => FailureReason::Storage(msg),
        other => FailureReason::Internal(other.to_string()),
    }
}
