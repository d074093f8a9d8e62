//! Domain types and models

pub mod location;
pub mod sync;
pub mod tracking;

pub use location::{LocationSample, LocationTaskEvent};
pub use sync::{Credentials, FailureReason, LastSaveRecord, SyncOutcome, SyncPayload};
pub use tracking::{
    ForegroundNotification, LocationAccuracy, PermissionStatus, TrackingOptions, TrackingStatus,
};
