//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

use serde::{Deserialize, Serialize};

/// Bytes per megabyte used when converting MB-based limits.
pub const BYTES_PER_MB: usize = 1024 * 1024;

/// Cache configuration parameters.
///
/// Sizes are held in bytes and durations in seconds. A `max_entry_size` of 0
/// means no per-entry ceiling; a `purge_interval` of 0 disables the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Byte budget for the whole store
    pub max_size: usize,
    /// Byte ceiling per entry (0 = unlimited)
    pub max_entry_size: usize,
    /// Default TTL in seconds for entries set without explicit TTL
    pub default_ttl: u64,
    /// Seconds between purge sweeps (0 = disabled)
    pub purge_interval: u64,
}

impl CacheConfig {
    /// Creates a config from megabyte limits.
    ///
    /// # Arguments
    /// * `max_size_mb` - Store budget in megabytes
    /// * `max_entry_mb` - Per-entry ceiling in megabytes (0 = unlimited)
    /// * `default_ttl` - Fallback TTL in seconds
    /// * `purge_interval` - Sweep period in seconds (0 = disabled)
    pub fn new(max_size_mb: usize, max_entry_mb: usize, default_ttl: u64, purge_interval: u64) -> Self {
        Self {
            max_size: max_size_mb.saturating_mul(BYTES_PER_MB),
            max_entry_size: max_entry_mb.saturating_mul(BYTES_PER_MB),
            default_ttl,
            purge_interval,
        }
    }

    /// Creates a config with limits given directly in bytes.
    pub fn from_bytes(max_size: usize, max_entry_size: usize, default_ttl: u64, purge_interval: u64) -> Self {
        Self {
            max_size,
            max_entry_size,
            default_ttl,
            purge_interval,
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE_MB` - Store budget in MB (default: 100)
    /// - `CACHE_MAX_ENTRY_MB` - Per-entry ceiling in MB (default: 2)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 60)
    /// - `CACHE_PURGE_INTERVAL` - Purge frequency in seconds (default: 30)
    pub fn from_env() -> Self {
        Self::new(
            env_or("CACHE_MAX_SIZE_MB", 100),
            env_or("CACHE_MAX_ENTRY_MB", 2),
            env_or("CACHE_DEFAULT_TTL", 60),
            env_or("CACHE_PURGE_INTERVAL", 30),
        )
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(100, 2, 60, 30)
    }
}
