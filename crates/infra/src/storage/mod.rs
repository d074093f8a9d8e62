//! Key-value stores backing credentials and the last-save record
//!
//! - [`KeychainStore`]: OS keychain via `keyring`
//! - [`FileStore`]: JSON document on disk, replaced atomically
//! - [`MemoryStore`]: process-local, for tests and ephemeral agents

mod file;
mod keychain;
mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use geosync_core::CredentialStore;
use geosync_domain::{GeoSyncError, Result, StorageBackend, StorageConfig};
use tracing::info;

pub use file::FileStore;
pub use keychain::KeychainStore;
pub use memory::MemoryStore;

/// Build the store selected by `config.backend`.
///
/// # Errors
///
/// Returns `GeoSyncError::Config` when the file backend has no path.
pub fn build_store(config: &StorageConfig) -> Result<Arc<dyn CredentialStore>> {
    let store: Arc<dyn CredentialStore> = match config.backend {
        StorageBackend::Keychain => {
            info!(service = %config.keychain_service, "using keychain storage");
            Arc::new(KeychainStore::new(config.keychain_service.clone()))
        }
        StorageBackend::File => {
            let path = config
                .path
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .ok_or_else(|| {
                    GeoSyncError::Config("storage.path is required for the file backend".into())
                })?;
            info!(path = %path.display(), "using file storage");
            Arc::new(FileStore::new(path))
        }
        StorageBackend::Memory => {
            info!("using in-memory storage");
            Arc::new(MemoryStore::new())
        }
    };

    Ok(store)
}
