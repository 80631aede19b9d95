//! Shared library for the anime browser workspace.
//!
//! This crate provides common functionality used by the fetch library and the
//! browser binary:
//! - Configuration management
//! - Logging infrastructure

pub mod config;
pub mod logging;

// Re-export commonly used types
pub use config::{CacheBackend, Config};
pub use logging::LogConfig;
