//! Persistent key-value stores for cached API payloads.
//!
//! Every backend maps a logical dataset key (`carousel`, `trending`, ...) to
//! a raw JSON string. Entries never expire; they live until removed or
//! cleared explicitly.

mod file;
mod sqlite;

pub use file::FileStore;
pub use sqlite::SqliteStore;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Synchronous string key-value store.
///
/// Reads and writes are atomic per key. There are no cross-key transactions.
pub trait KeyValueStore: Send + Sync {
    /// Raw payload stored under `key`, if any
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous payload
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; returns whether it was present
    fn remove(&self, key: &str) -> Result<bool>;

    /// Delete every entry
    fn clear(&self) -> Result<()>;

    /// Metadata for every stored entry, ordered by key
    fn entries(&self) -> Result<Vec<EntryInfo>>;
}

/// Listing metadata for one stored entry
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInfo {
    pub key: String,
    pub size_bytes: u64,
    /// When the payload was written, if the backend records it
    pub stored_at: Option<DateTime<Utc>>,
}

/// In-process store, used for tests and cache-less runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, (String, DateTime<Utc>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, (String, DateTime<Utc>)>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).map(|(value, _)| value.clone()))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?
            .insert(key.to_string(), (value.to_string(), Utc::now()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.remove(key).is_some())
    }

    fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }

    fn entries(&self) -> Result<Vec<EntryInfo>> {
        Ok(self
            .lock()?
            .iter()
            .map(|(key, (value, stored_at))| EntryInfo {
                key: key.clone(),
                size_bytes: value.len() as u64,
                stored_at: Some(*stored_at),
            })
            .collect())
    }
}
