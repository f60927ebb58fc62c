//! Cache Module
//!
//! Provides in-memory caching with a byte budget, TTL refresh and
//! TTL-proximity eviction.

mod entry;
mod eviction;
mod handle;
mod measure;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use eviction::lowest_remaining_ttl;
pub use handle::Cache;
pub use measure::Measure;
pub use stats::CacheStats;
pub use store::{CacheStore, SetOutcome};
