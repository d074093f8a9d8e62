//! Client for the `saveLocations` endpoint
//!
//! # Wire format
//!
//! `POST {base_url}/saveLocations` with `Content-Type: application/json`
//! and the auth token in the `secret_key` header. Any 2xx is success.

use std::time::Duration;

use async_trait::async_trait;
use geosync_core::LocationPingSender;
use geosync_domain::constants::{AUTH_HEADER, SAVE_LOCATIONS_PATH};
use geosync_domain::{ApiConfig, GeoSyncError, Result, SyncPayload};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::http::HttpClient;

/// Extra time granted to the transport so the request deadline fires first.
const TRANSPORT_GRACE: Duration = Duration::from_secs(1);

/// Longest response body quoted in an error message.
const MAX_ERROR_BODY: usize = 256;

/// HTTP sender for location pings
#[derive(Clone)]
pub struct LocationSyncClient {
    http_client: HttpClient,
    endpoint: Url,
    timeout: Duration,
}

impl LocationSyncClient {
    /// Build a client for `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns `GeoSyncError::Config` if the base URL does not parse.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let endpoint = endpoint_url(&config.base_url)?;
        let timeout = config.timeout();
        let http_client = HttpClient::builder().timeout(timeout + TRANSPORT_GRACE).build()?;

        Ok(Self { http_client, endpoint, timeout })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl LocationPingSender for LocationSyncClient {
    #[instrument(skip(self, payload, auth_token), fields(endpoint = %self.endpoint))]
    async fn send(&self, payload: &SyncPayload, auth_token: &str) -> Result<()> {
        let request = self
            .http_client
            .request(Method::POST, self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTH_HEADER, auth_token)
            .json(payload);

        let response = tokio::time::timeout(self.timeout, self.http_client.send(request))
            .await
            .map_err(|_| GeoSyncError::timeout(self.timeout))??;

        let status = response.status();
        if status.is_success() {
            debug!(%status, "saveLocations accepted ping");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("unknown status").to_string()
        } else {
            truncate(body.trim(), MAX_ERROR_BODY)
        };
        warn!(%status, "saveLocations rejected ping");

        Err(GeoSyncError::Http { status: status.as_u16(), message })
    }
}

/// `{base_url}/saveLocations`, tolerating a trailing slash on the base.
fn endpoint_url(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url.trim()).map_err(|err| {
        GeoSyncError::Config(format!("invalid API base URL {base_url:?}: {err}"))
    })?;

    if base.cannot_be_a_base() {
        return Err(GeoSyncError::Config(format!("API base URL {base_url:?} cannot be a base")));
    }

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(SAVE_LOCATIONS_PATH)
        .map_err(|err| GeoSyncError::Config(format!("invalid sync endpoint: {err}")))
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
