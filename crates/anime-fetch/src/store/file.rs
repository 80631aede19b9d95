//! One JSON file per cache key.

use super::{EntryInfo, KeyValueStore};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// File-backed store rooted at a cache directory
pub struct FileStore {
    cache_dir: PathBuf,
    // Serializes mutations so concurrent writers to one key replace whole files
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (and create if needed) a cache directory
    pub fn new(cache_dir: impl AsRef<Path>) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory: {}", cache_dir.display()))?;
        debug!(cache_dir = %cache_dir.display(), "File cache opened");

        Ok(Self {
            cache_dir,
            write_lock: Mutex::new(()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get the cache file path for a given key
    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", Self::file_stem(key)))
    }

    /// Percent-encode every byte outside `[A-Za-z0-9._-]` so distinct keys
    /// never share a file name
    fn file_stem(key: &str) -> String {
        let mut stem = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.') {
                stem.push(char::from(byte));
            } else {
                stem.push_str(&format!("%{:02X}", byte));
            }
        }
        stem
    }

    /// Inverse of [`Self::file_stem`]; `None` for names this store did not write
    fn key_from_stem(stem: &str) -> Option<String> {
        let mut bytes = Vec::with_capacity(stem.len());
        let mut rest = stem.as_bytes();
        while let Some((&byte, tail)) = rest.split_first() {
            if byte == b'%' {
                let hex = tail.get(..2)?;
                let hex = std::str::from_utf8(hex).ok()?;
                bytes.push(u8::from_str_radix(hex, 16).ok()?);
                rest = &tail[2..];
            } else {
                bytes.push(byte);
                rest = tail;
            }
        }
        String::from_utf8(bytes).ok()
    }

    fn json_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.cache_dir)
            .with_context(|| format!("Failed to list cache directory: {}", self.cache_dir.display()))?
        {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.cache_path(key);
        if !path.exists() {
            debug!(key = key, "Cache miss");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", path.display()))?;

        debug!(key = key, "Cache hit");
        Ok(Some(content))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.cache_path(key);
        let _guard = self.lock();

        // Readers only ever see a complete payload
        let mut tmp = NamedTempFile::new_in(&self.cache_dir)
            .with_context(|| format!("Failed to create temp file in: {}", self.cache_dir.display()))?;
        tmp.write_all(value.as_bytes())
            .with_context(|| format!("Failed to write cache file: {}", tmp.path().display()))?;
        tmp.persist(&path)
            .with_context(|| format!("Failed to move cache file into place: {}", path.display()))?;

        debug!(key = key, path = %path.display(), "Cache stored");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let path = self.cache_path(key);
        let _guard = self.lock();
        if !path.exists() {
            return Ok(false);
        }

        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove cache file: {}", path.display()))?;
        Ok(true)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock();
        for path in self.json_files()? {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove cache file: {}", path.display()))?;
        }
        info!(cache_dir = %self.cache_dir.display(), "Cache cleared");
        Ok(())
    }

    fn entries(&self) -> Result<Vec<EntryInfo>> {
        let mut entries = Vec::new();
        for path in self.json_files()? {
            let Some(key) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(Self::key_from_stem)
            else {
                warn!(path = %path.display(), "Skipping unrecognized cache file");
                continue;
            };
            let metadata = std::fs::metadata(&path)?;

            entries.push(EntryInfo {
                key,
                size_bytes: metadata.len(),
                stored_at: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }
}
