//! Cached, retrying access to the Jikan anime API.
//!
//! The [`CachedFetcher`] serves JSON payloads from a persistent
//! [`KeyValueStore`] when present and otherwise fetches them through a
//! [`RetryingClient`], caching the result under a logical dataset key.

pub mod api;
pub mod debounce;
pub mod error;
pub mod fetcher;
pub mod store;

pub use api::{
    AnimeListResponse, AnimeRecord, Endpoints, RawResponse, ReqwestTransport, RetryPolicy,
    RetryingClient, Transport, JIKAN_BASE_URL,
};
pub use debounce::Debouncer;
pub use error::FetchError;
pub use fetcher::CachedFetcher;
pub use store::{EntryInfo, FileStore, KeyValueStore, MemoryStore, SqliteStore};
