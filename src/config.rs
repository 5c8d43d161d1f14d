//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::BoundedByteCache;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of payloads the cache can hold
    pub max_entries: usize,
    /// Age in seconds after which a payload expires
    pub max_age: u64,
    /// Byte ceiling across all payloads, in MiB
    pub max_total_mb: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Maintenance task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cached payloads (default: 50)
    /// - `MAX_AGE` - Payload lifetime in seconds (default: 86400)
    /// - `MAX_TOTAL_MB` - Total payload ceiling in MiB (default: 100)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 3600)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            max_age: env_or("MAX_AGE", defaults.max_age),
            max_total_mb: env_or("MAX_TOTAL_MB", defaults.max_total_mb),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    pub fn max_total_bytes(&self) -> usize {
        self.max_total_mb.saturating_mul(1024 * 1024)
    }

    /// Builds the byte cache described by this configuration.
    pub fn build_cache(&self) -> BoundedByteCache {
        BoundedByteCache::new(
            self.max_entries,
            Duration::from_secs(self.max_age),
            self.max_total_bytes(),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 50,
            max_age: 24 * 3600,
            max_total_mb: 100,
            server_port: 3000,
            cleanup_interval: 3600,
        }
    }
}

/// Parses `name` from the environment, falling back on absence or bad input.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
