//! Configuration management for the anime browser.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Jikan API settings
    pub api: ApiConfig,

    /// Response cache settings
    pub cache: CacheConfig,

    /// Home page layout settings
    #[serde(default)]
    pub page: PageConfig,

    /// Search box settings
    #[serde(default)]
    pub search: SearchConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output (stderr)
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Jikan API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Jikan API base URL
    pub base_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Maximum attempts per request (first try included)
    pub max_attempts: u32,

    /// Fixed delay between attempts in milliseconds
    pub retry_delay_ms: u64,
}

/// Which persistent store backs the response cache
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// SQLite database with one row per key
    Sqlite,
    /// One JSON file per key
    File,
    /// In-process only, gone when the process exits
    Memory,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Store backend
    pub backend: CacheBackend,

    /// Database file or cache directory (relative to data directory)
    pub path: String,
}

/// Home page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Number of hero carousel slides
    pub carousel_limit: u32,

    /// Number of cards in each category grid
    pub section_limit: u32,

    /// Carousel autoplay interval in milliseconds
    pub autoplay_ms: u64,
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a search fires, in milliseconds
    pub debounce_ms: u64,

    /// Maximum results shown in the dropdown
    pub result_limit: u32,

    /// Titles longer than this are truncated in the dropdown
    pub title_max_chars: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            carousel_limit: 10,
            section_limit: 6,
            autoplay_ms: 2500,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            result_limit: 5,
            title_max_chars: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: false,
                json_format: false,
            },
            api: ApiConfig {
                base_url: "https://api.jikan.moe/v4".to_string(),
                user_agent: concat!("anime-browser/", env!("CARGO_PKG_VERSION")).to_string(),
                max_attempts: 3,
                retry_delay_ms: 1000,
            },
            cache: CacheConfig {
                backend: CacheBackend::Sqlite,
                path: "cache.db".to_string(),
            },
            page: PageConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.logging.log_dir)
    }

    /// Get the path for the cache database or cache directory
    pub fn cache_path(&self) -> PathBuf {
        self.resolve(&self.cache.path)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir().join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.root_dir, "data");
        assert_eq!(config.api.base_url, "https://api.jikan.moe/v4");
        assert_eq!(config.api.max_attempts, 3);
        assert_eq!(config.api.retry_delay_ms, 1000);
        assert_eq!(config.cache.backend, CacheBackend::Sqlite);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.title_max_chars, 30);
        assert_eq!(config.page.carousel_limit, 10);
    }

    #[test]
    fn test_save_and_load_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let mut original_config = Config::default();
        original_config.cache.backend = CacheBackend::File;
        original_config.cache.path = "responses".to_string();
        original_config.save(&config_path)?;

        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path)?;
        assert_eq!(loaded_config.data.root_dir, original_config.data.root_dir);
        assert_eq!(loaded_config.api.base_url, original_config.api.base_url);
        assert_eq!(loaded_config.cache.backend, CacheBackend::File);
        assert_eq!(loaded_config.cache.path, "responses");

        Ok(())
    }

    #[test]
    fn test_missing_sections_use_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.page.section_limit = 4;
        config.save(&config_path)?;

        // Drop the optional [page] and [search] tables
        let content = std::fs::read_to_string(&config_path)?;
        let trimmed: String = content
            .split("\n[page]")
            .next()
            .unwrap_or_default()
            .to_string();
        std::fs::write(&config_path, trimmed)?;

        let loaded = Config::from_file(&config_path)?;
        assert_eq!(loaded.page.section_limit, 6);
        assert_eq!(loaded.search.result_limit, 5);

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        // Should return default config without error
        assert_eq!(config.data.root_dir, "data");
    }

    #[test]
    fn test_path_resolution() {
        let mut config = Config::default();

        let log_dir = config.log_dir();
        assert!(log_dir.ends_with("data/logs"));

        let cache_path = config.cache_path();
        assert!(cache_path.ends_with("data/cache.db"));

        config.cache.path = "/tmp/anime-cache.db".to_string();
        assert_eq!(config.cache_path(), PathBuf::from("/tmp/anime-cache.db"));
    }
}
