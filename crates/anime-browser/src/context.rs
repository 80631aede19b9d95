//! Wiring of stores, HTTP client and fetcher from configuration.

use crate::search::SearchService;
use anime_fetch::{
    CachedFetcher, Endpoints, FileStore, KeyValueStore, MemoryStore, ReqwestTransport,
    RetryPolicy, RetryingClient, SqliteStore, Transport,
};
use anyhow::{Context, Result};
use shared::{CacheBackend, Config};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Everything a command needs, built once at startup
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub endpoints: Endpoints,
    pub fetcher: CachedFetcher,
    pub search: SearchService,
}

impl AppContext {
    /// Build the production context: reqwest transport and the configured store
    pub fn from_config(config: Config, no_cache: bool) -> Result<Self> {
        let store = open_store(&config, no_cache)?;
        let transport = ReqwestTransport::new(&config.api.user_agent)
            .context("Failed to create HTTP transport")?;

        Self::with_parts(config, store, Arc::new(transport))
    }

    /// Build a context over an explicit store and transport
    pub fn with_parts(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let endpoints = Endpoints::new(&config.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", config.api.base_url))?;

        let policy = RetryPolicy::new(
            config.api.max_attempts,
            Duration::from_millis(config.api.retry_delay_ms),
        );
        let client = RetryingClient::new(transport, policy);

        let search = SearchService::new(client.clone(), endpoints.clone(), config.search.result_limit);
        let fetcher = CachedFetcher::new(store, client);

        Ok(Self {
            config,
            endpoints,
            fetcher,
            search,
        })
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        self.fetcher.store()
    }
}

/// Open the store selected by `[cache]`, or a memory store when `no_cache` is set
pub fn open_store(config: &Config, no_cache: bool) -> Result<Arc<dyn KeyValueStore>> {
    let backend = if no_cache {
        CacheBackend::Memory
    } else {
        config.cache.backend
    };
    let path = config.cache_path();

    let store: Arc<dyn KeyValueStore> = match backend {
        CacheBackend::Sqlite => Arc::new(
            SqliteStore::open(&path)
                .with_context(|| format!("Failed to open cache database: {}", path.display()))?,
        ),
        CacheBackend::File => Arc::new(
            FileStore::new(&path)
                .with_context(|| format!("Failed to open cache directory: {}", path.display()))?,
        ),
        CacheBackend::Memory => Arc::new(MemoryStore::new()),
    };

    info!(backend = ?backend, path = %path.display(), "Cache store ready");
    Ok(store)
}
