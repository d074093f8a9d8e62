//! Typed access to the keys the tracking task reads and writes.

use geosync_domain::constants::{
    KEY_AUTH_TOKEN, KEY_CURRENT_DAY_DATE, KEY_LAST_BACKGROUND_SAVE, KEY_USER_ID,
};
use geosync_domain::{Credentials, LastSaveRecord, Result};
use tracing::warn;

use super::ports::CredentialStore;

/// Read credentials. `Ok(None)` when the user id or token is missing or empty.
pub async fn read_credentials(store: &dyn CredentialStore) -> Result<Option<Credentials>> {
    let user_id = non_empty(store.get(KEY_USER_ID).await?);
    let auth_token = non_empty(store.get(KEY_AUTH_TOKEN).await?);

    let (Some(user_id), Some(auth_token)) = (user_id, auth_token) else {
        return Ok(None);
    };

    let current_day_date = non_empty(store.get(KEY_CURRENT_DAY_DATE).await?);
    Ok(Some(Credentials { user_id, auth_token, current_day_date }))
}

/// Load the last successful sync. A record that no longer parses is treated
/// as absent.
pub async fn load_last_save(store: &dyn CredentialStore) -> Result<Option<LastSaveRecord>> {
    let Some(raw) = store.get(KEY_LAST_BACKGROUND_SAVE).await? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(record) => Ok(Some(record)),
        Err(err) => {
            warn!(error = %err, "Discarding unreadable last-save record");
            Ok(None)
        }
    }
}

/// Overwrite the last-save record.
pub async fn save_last_save(store: &dyn CredentialStore, record: &LastSaveRecord) -> Result<()> {
    let raw = serde_json::to_string(record)?;
    store.set(KEY_LAST_BACKGROUND_SAVE, &raw).await
}

pub async fn clear_last_save(store: &dyn CredentialStore) -> Result<()> {
    store.remove(KEY_LAST_BACKGROUND_SAVE).await
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
