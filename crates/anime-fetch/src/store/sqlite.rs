//! SQLite-backed store: one row per cache key.

use super::{EntryInfo, KeyValueStore};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS cache_entries (
    key TEXT PRIMARY KEY NOT NULL,
    payload TEXT NOT NULL,
    stored_at TEXT NOT NULL
);
";

/// Store persisted in a single SQLite database file
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache directory: {}", parent.display()))?;
        }

        debug!(path = %path.display(), "Opening cache database");

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        Self::with_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .context("Failed to create cache schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Cache database lock poisoned"))
    }
}

impl KeyValueStore for SqliteStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let payload: Option<String> = self
            .conn()?
            .query_row(
                "SELECT payload FROM cache_entries WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read cache entry: {}", key))?;

        debug!(key = key, hit = payload.is_some(), "Cache lookup");
        Ok(payload)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.conn()?
            .execute(
                "INSERT OR REPLACE INTO cache_entries (key, payload, stored_at) VALUES (?1, ?2, ?3)",
                params![key, value, Utc::now()],
            )
            .with_context(|| format!("Failed to write cache entry: {}", key))?;

        debug!(key = key, bytes = value.len(), "Cache stored");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn()?
            .execute("DELETE FROM cache_entries WHERE key = ?1", [key])
            .with_context(|| format!("Failed to remove cache entry: {}", key))?;
        Ok(removed > 0)
    }

    fn clear(&self) -> Result<()> {
        let removed = self
            .conn()?
            .execute("DELETE FROM cache_entries", [])
            .context("Failed to clear cache")?;
        info!(entries = removed, "Cache cleared");
        Ok(())
    }

    fn entries(&self) -> Result<Vec<EntryInfo>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT key, length(CAST(payload AS BLOB)), stored_at FROM cache_entries ORDER BY key",
        )?;

        let entries = stmt
            .query_map([], |row| {
                Ok(EntryInfo {
                    key: row.get(0)?,
                    size_bytes: row.get::<_, i64>(1)? as u64,
                    stored_at: row.get::<_, Option<DateTime<Utc>>>(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to list cache entries")?;

        Ok(entries)
    }
}
