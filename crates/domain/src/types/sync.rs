//! Sync payload, persisted record and outcome types

use serde::{Deserialize, Serialize};

/// Credentials and session context read from secure storage on every
/// invocation. Never cached between invocations.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub auth_token: String,
    pub current_day_date: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("auth_token", &"<redacted>")
            .field("current_day_date", &self.current_day_date)
            .finish()
    }
}

/// JSON body posted to `saveLocations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPayload {
    pub user_id: i64,
    /// `YYYY-MM-DD`
    pub day: String,
    pub latitude: f64,
    pub longitude: f64,
    /// IST timestamp, `YYYY-MM-DDTHH:mm:ss+05:30`
    pub timestamp: String,
    pub is_background: bool,
}

/// The most recent successful sync, stored under `lastBackgroundSave`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastSaveRecord {
    pub timestamp: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&SyncPayload> for LastSaveRecord {
    fn from(payload: &SyncPayload) -> Self {
        Self {
            timestamp: payload.timestamp.clone(),
            latitude: payload.latitude,
            longitude: payload.longitude,
        }
    }
}

/// Why an attempted sync did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The provider reported an error instead of a fix.
    Provider(String),
    /// The event carried no samples.
    NoLocation,
    /// `userid` could not be read as an integer.
    InvalidUserId(String),
    /// Secure storage could not be read or written.
    Storage(String),
    /// No response within the request deadline.
    Timeout,
    /// The endpoint answered with a non-2xx status.
    Http(u16),
    /// Connection or transport failure.
    Network(String),
    /// Anything else, including a panic caught at the handler boundary.
    Internal(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(msg) => write!(f, "location provider error: {msg}"),
            Self::NoLocation => write!(f, "no location in event"),
            Self::InvalidUserId(raw) => write!(f, "user id {raw:?} is not an integer"),
            Self::Storage(msg) => write!(f, "storage error: {msg}"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Http(status) => write!(f, "endpoint returned HTTP {status}"),
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

/// Result of one task invocation, reported for logging.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Success(LastSaveRecord),
    SkippedRateLimit { elapsed_ms: i64 },
    SkippedNoCredentials,
    Failed(FailureReason),
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Short label for structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::SkippedRateLimit { .. } => "skipped_rate_limit",
            Self::SkippedNoCredentials => "skipped_no_credentials",
            Self::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_uses_wire_field_names() {
        let payload = SyncPayload {
            user_id: 42,
            day: "2024-03-01".into(),
            latitude: 12.9716,
            longitude: 77.5946,
            timestamp: "2024-03-01T10:30:00+05:30".into(),
            is_background: true,
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"{"userId":42,"day":"2024-03-01","latitude":12.9716,"longitude":77.5946,"timestamp":"2024-03-01T10:30:00+05:30","isBackground":true}"#
        );
    }

    #[test]
    fn credentials_debug_hides_token() {
        let creds = Credentials {
            user_id: "42".into(),
            auth_token: "s3cr3t".into(),
            current_day_date: None,
        };
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("42"));
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(SyncOutcome::SkippedNoCredentials.label(), "skipped_no_credentials");
        assert_eq!(SyncOutcome::Failed(FailureReason::Timeout).label(), "failed");
        assert!(!SyncOutcome::SkippedRateLimit { elapsed_ms: 10 }.is_success());
    }
}
