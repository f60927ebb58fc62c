//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The value has no defined byte length
    #[error("Size of value for key {0} cannot be measured")]
    SizeUnmeasurable(String),

    /// The value is larger than the per-entry ceiling
    #[error("Entry {key} is {size} bytes, per-entry limit is {max} bytes")]
    EntryTooLarge { key: String, size: usize, max: usize },

    /// The value alone is larger than the whole store budget
    #[error("Entry {key} is {size} bytes, store budget is {max} bytes")]
    ExceedsCapacity { key: String, size: usize, max: usize },

    /// A purge interval was configured outside of a tokio runtime
    #[error("Purge task requires a running tokio runtime")]
    NoRuntime,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
