//! Conversions from external infrastructure errors into domain errors.

use geosync_domain::GeoSyncError;
use keyring::Error as KeyringError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub GeoSyncError);

impl From<InfraError> for GeoSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<GeoSyncError> for InfraError {
    fn from(value: GeoSyncError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoGeoSyncError {
    fn into_geosync(self) -> GeoSyncError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → GeoSyncError */
/* -------------------------------------------------------------------------- */

impl IntoGeoSyncError for KeyringError {
    fn into_geosync(self) -> GeoSyncError {
        use KeyringError::{Ambiguous, BadEncoding, NoStorageAccess, PlatformFailure};

        let description = self.to_string();

        match self {
            BadEncoding(_) => GeoSyncError::Storage("keychain value is not valid UTF-8".into()),
            Ambiguous(entries) => GeoSyncError::Storage(format!(
                "multiple keychain entries matched request ({} results)",
                entries.len()
            )),
            PlatformFailure(err) => GeoSyncError::Storage(format!("keychain platform error: {err}")),
            NoStorageAccess(err) => {
                GeoSyncError::Storage(format!("unable to access secure storage: {err}"))
            }
            _ => GeoSyncError::Storage(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        InfraError(value.into_geosync())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → GeoSyncError */
/* -------------------------------------------------------------------------- */

impl IntoGeoSyncError for HttpError {
    fn into_geosync(self) -> GeoSyncError {
        if self.is_timeout() {
            return GeoSyncError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return GeoSyncError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return GeoSyncError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            };
        }

        if self.is_builder() {
            return GeoSyncError::Config(format!("invalid HTTP request: {self}"));
        }

        GeoSyncError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_geosync())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → GeoSyncError */
/* -------------------------------------------------------------------------- */

impl IntoGeoSyncError for std::io::Error {
    fn into_geosync(self) -> GeoSyncError {
        GeoSyncError::Storage(format!("file I/O failed ({:?}): {self}", self.kind()))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_geosync())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
