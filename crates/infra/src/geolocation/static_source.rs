use std::sync::Arc;

use async_trait::async_trait;
use geosync_core::{Clock, LocationPermissions, LocationSource, SystemClock};
use geosync_domain::{LocationSample, PermissionStatus, Result, StaticLocationConfig};
use parking_lot::RwLock;

/// Reports a fixed, configured position stamped with the current time.
///
/// Doubles as the permission provider: both prompts answer `Granted`
/// unless overridden.
pub struct StaticLocationSource {
    position: RwLock<(f64, f64)>,
    clock: Arc<dyn Clock>,
    foreground: PermissionStatus,
    background: PermissionStatus,
}

impl StaticLocationSource {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            position: RwLock::new((latitude, longitude)),
            clock: Arc::new(SystemClock),
            foreground: PermissionStatus::Granted,
            background: PermissionStatus::Granted,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_permissions(
        mut self,
        foreground: PermissionStatus,
        background: PermissionStatus,
    ) -> Self {
        self.foreground = foreground;
        self.background = background;
        self
    }

    /// Move the reported position.
    pub fn set_position(&self, latitude: f64, longitude: f64) {
        *self.position.write() = (latitude, longitude);
    }
}

impl From<StaticLocationConfig> for StaticLocationSource {
    fn from(config: StaticLocationConfig) -> Self {
        Self::new(config.latitude, config.longitude)
    }
}

#[async_trait]
impl LocationSource for StaticLocationSource {
    async fn current_location(&self) -> Result<LocationSample> {
        let (latitude, longitude) = *self.position.read();
        Ok(LocationSample::new(latitude, longitude, self.clock.now()))
    }
}

#[async_trait]
impl LocationPermissions for StaticLocationSource {
    async fn request_foreground(&self) -> Result<PermissionStatus> {
        Ok(self.foreground)
    }

    async fn request_background(&self) -> Result<PermissionStatus> {
        Ok(self.background)
    }
}
