//! Liquid Cache - An in-process key/value cache
//!
//! Bounded by a global byte budget and a per-entry byte ceiling, with a
//! time-to-live per entry. Capacity eviction removes the entry with the least
//! remaining TTL; a background task purges entries past their deadline.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheEntry, CacheStats, CacheStore, Measure, SetOutcome};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use tasks::{spawn_purge_task, PurgeTask};
