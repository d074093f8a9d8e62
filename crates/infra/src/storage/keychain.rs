//! OS keychain store
//!
//! Each key becomes one keychain entry under the configured service name.
//! Keychain calls block, so they run on the blocking pool.

use async_trait::async_trait;
use geosync_core::CredentialStore;
use geosync_domain::{GeoSyncError, Result};
use keyring::Entry;
use tracing::debug;

use crate::errors::InfraError;

/// Credentials and last-save record in the platform keychain
#[derive(Debug, Clone)]
pub struct KeychainStore {
    service: String,
}

impl KeychainStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self { service: service.into() }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    async fn with_entry<T, F>(&self, key: &str, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Entry) -> Result<T> + Send + 'static,
    {
        let service = self.service.clone();
        let key = key.to_string();

        tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, &key).map_err(InfraError::from)?;
            op(entry)
        })
        .await
        .map_err(|err| GeoSyncError::Internal(format!("keychain task failed: {err}")))?
    }
}

#[async_trait]
impl CredentialStore for KeychainStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_entry(key, |entry| match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(InfraError::from(err).into()),
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let value = value.to_string();
        debug!(key, "writing keychain entry");
        self.with_entry(key, move |entry| {
            entry.set_password(&value).map_err(|err| InfraError::from(err).into())
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.with_entry(key, |entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(InfraError::from(err).into()),
        })
        .await
    }
}
