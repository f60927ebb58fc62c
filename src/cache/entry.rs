//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with size and TTL metadata.

use chrono::{DateTime, Duration, Utc};

use crate::cache::Measure;
use crate::error::{CacheError, Result};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// `size` is fixed when the entry is built; only the deadline moves.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Byte length of the value
    pub size: usize,
    /// Configured time-to-live in seconds
    pub ttl: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Absolute deadline, recomputed on every refresh
    pub expires_at: DateTime<Utc>,
}

impl<V: Measure> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry for `key` expiring `ttl_seconds` from now.
    ///
    /// # Errors
    /// `SizeUnmeasurable` if the value reports no byte length.
    pub fn new(key: &str, value: V, ttl_seconds: u64) -> Result<Self> {
        let size = value
            .byte_size()
            .ok_or_else(|| CacheError::SizeUnmeasurable(key.to_string()))?;
        let now = Utc::now();

        Ok(Self {
            value,
            size,
            ttl: ttl_seconds,
            created_at: now,
            expires_at: deadline_from(now, ttl_seconds),
        })
    }
}

impl<V> CacheEntry<V> {
    // == Refresh ==
    /// Resets the deadline to `now + ttl`.
    pub fn refresh_deadline(&mut self) {
        self.expires_at = deadline_from(Utc::now(), self.ttl);
    }

    // == Time To Live ==
    /// Returns the time left before the deadline, negative once it has passed.
    pub fn remaining_ttl(&self) -> Duration {
        self.expires_at - Utc::now()
    }

    /// Remaining TTL in whole seconds, negative once expired.
    pub fn remaining_ttl_secs(&self) -> i64 {
        self.remaining_ttl().num_seconds()
    }

    // == Is Expired ==
    /// Checks if the entry is strictly past its deadline.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

fn deadline_from(now: DateTime<Utc>, ttl_seconds: u64) -> DateTime<Utc> {
    let ttl = i64::try_from(ttl_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX);
    now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC)
}
