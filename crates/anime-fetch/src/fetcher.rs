//! Cache-first JSON fetching.
//!
//! A payload is fetched at most once per key: the first successful response
//! is stored and served from then on, with no expiry and no refresh. Failed
//! fetches store nothing, so a later call retries from scratch.

use crate::api::{validate_url, RetryingClient};
use crate::error::FetchError;
use crate::store::KeyValueStore;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Serves JSON from a persistent store, fetching and storing on a miss
#[derive(Clone)]
pub struct CachedFetcher {
    store: Arc<dyn KeyValueStore>,
    client: RetryingClient,
}

impl CachedFetcher {
    pub fn new(store: Arc<dyn KeyValueStore>, client: RetryingClient) -> Self {
        Self { store, client }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Return the JSON for `key`, or `None` when no data is available.
    ///
    /// Any failure is logged and swallowed.
    pub async fn get(&self, url: &str, key: &str) -> Option<Value> {
        match self.try_get(url, key).await {
            Ok(value) => Some(value),
            Err(e) => {
                error!(url = %url, key = key, error = %e, "Error fetching data");
                None
            }
        }
    }

    /// Same lookup as [`get`](Self::get), surfacing the failure.
    ///
    /// A stored payload is returned without touching the network, whatever
    /// `url` is. On a miss the body is parsed, re-serialized and written under
    /// `key` before being returned.
    pub async fn try_get(&self, url: &str, key: &str) -> Result<Value, FetchError> {
        if key.trim().is_empty() {
            return Err(FetchError::InvalidKey);
        }

        if let Some(cached) = self.store.read(key).map_err(FetchError::Store)? {
            debug!(key = key, bytes = cached.len(), "Serving cached payload");
            return Ok(serde_json::from_str(&cached)?);
        }

        validate_url(url)?;
        info!(key = key, url = %url, "Cache miss, fetching");

        let response = self.client.fetch_with_retries(url).await?;
        let value: Value = response.json()?;

        let payload = serde_json::to_string(&value)?;
        self.store
            .write(key, &payload)
            .map_err(FetchError::Store)?;

        debug!(key = key, bytes = payload.len(), "Payload cached");
        Ok(value)
    }
}
