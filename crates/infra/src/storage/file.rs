//! JSON-file store
//!
//! The whole map is rewritten on every change: written to a temporary file
//! in the same directory, then renamed over the target.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use geosync_core::CredentialStore;
use geosync_domain::{GeoSyncError, Result};
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::InfraError;

type Entries = BTreeMap<String, String>;

/// Store persisted as a flat JSON object
#[derive(Debug, Clone)]
pub struct FileStore {
    inner: Arc<StoreFile>,
}

#[derive(Debug)]
struct StoreFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { inner: Arc::new(StoreFile { path: path.into(), write_lock: Mutex::new(()) }) }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Run file I/O on the blocking pool
    async fn blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&StoreFile) -> Result<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(&inner))
            .await
            .map_err(|err| GeoSyncError::Internal(format!("file store task failed: {err}")))?
    }
}

impl StoreFile {
    fn load(&self) -> Result<Entries> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Entries::new()),
            Ok(text) => serde_json::from_str(&text).map_err(|err| {
                GeoSyncError::Storage(format!(
                    "corrupt store file {}: {err}",
                    self.path.display()
                ))
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    fn persist(&self, entries: &Entries) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(InfraError::from)?;

        let json = serde_json::to_vec_pretty(entries)?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(InfraError::from)?;
        tmp.write_all(&json).map_err(InfraError::from)?;
        tmp.as_file().sync_all().map_err(InfraError::from)?;
        tmp.persist(&self.path).map_err(|err| InfraError::from(err.error))?;

        debug!(path = %self.path.display(), keys = entries.len(), "store file written");
        Ok(())
    }

    fn update<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Entries) -> bool,
    {
        let _guard = self.write_lock.lock();
        let mut entries = self.load()?;
        if change(&mut entries) {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.blocking(move |file| Ok(file.load()?.remove(&key))).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let (key, value) = (key.to_string(), value.to_string());
        self.blocking(move |file| {
            file.update(|entries| {
                entries.insert(key, value);
                true
            })
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.blocking(move |file| file.update(|entries| entries.remove(&key).is_some())).await
    }
}
