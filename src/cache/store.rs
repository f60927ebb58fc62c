//! Cache Store Module
//!
//! Main cache engine: byte-budget admission, TTL refresh and TTL-proximity eviction.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{lowest_remaining_ttl, CacheEntry, CacheStats, Measure};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Set Outcome ==
/// What a successful set did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The key was absent and a new entry was admitted
    Inserted,
    /// The key held a different value, which was replaced
    Replaced,
    /// The key already held an equal value; only its deadline moved
    Refreshed,
}

// == Cache Store ==
/// Single-owner cache storage with size accounting and TTL metadata.
///
/// `total_size` always equals the sum of entry sizes, and never exceeds
/// `max_size`: values larger than the whole budget are refused up front.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Sum of `size` over all entries
    total_size: usize,
    /// Activity statistics
    stats: CacheStats,
    /// Byte budget for the whole store
    max_size: usize,
    /// Byte ceiling per entry (0 = unlimited)
    max_entry_size: usize,
    /// Default TTL in seconds for entries without explicit TTL
    default_ttl: u64,
}

impl<V: Measure + PartialEq> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store with limits given in bytes.
    ///
    /// # Arguments
    /// * `max_size` - Byte budget for the whole store
    /// * `max_entry_size` - Byte ceiling per entry (0 = unlimited)
    /// * `default_ttl` - Default TTL in seconds for entries without explicit TTL
    pub fn new(max_size: usize, max_entry_size: usize, default_ttl: u64) -> Self {
        Self {
            entries: HashMap::new(),
            total_size: 0,
            stats: CacheStats::new(),
            max_size,
            max_entry_size,
            default_ttl,
        }
    }

    /// Creates an empty store from a config. The purge interval is not used
    /// here; the sweep is driven by [`crate::cache::Cache`].
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_size, config.max_entry_size, config.default_ttl)
    }

    // == Get ==
    /// Looks up an entry by key.
    ///
    /// Entries past their deadline but not yet purged are still returned.
    /// Unless `silent`, the entry's deadline is refreshed first.
    pub fn get(&mut self, key: &str, silent: bool) -> Option<&CacheEntry<V>> {
        match self.entries.get_mut(key) {
            Some(entry) => {
                if !silent {
                    entry.refresh_deadline();
                }
                self.stats.record_hit();
                Some(entry)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Has Key ==
    /// Pure membership test; does not touch deadlines or stats.
    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Set ==
    /// Stores a value, returning true if it was admitted or refreshed.
    ///
    /// See [`CacheStore::try_set`] for the rejection conditions.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<u64>) -> bool {
        self.try_set(key, value, ttl).is_ok()
    }

    /// Stores a value under `key` with an optional TTL override.
    ///
    /// - Absent key: the value is admitted, evicting entries with the least
    ///   remaining TTL until it fits.
    /// - Present key, equal value: only the existing deadline is refreshed
    ///   (with the entry's own TTL).
    /// - Present key, different value: the old entry is removed and the new
    ///   one admitted.
    ///
    /// # Errors
    /// Nothing is mutated when the value is unmeasurable, larger than the
    /// per-entry ceiling, or larger than the whole store budget.
    pub fn try_set(&mut self, key: impl Into<String>, value: V, ttl: Option<u64>) -> Result<SetOutcome> {
        let key = key.into();
        let ttl = ttl.unwrap_or(self.default_ttl);

        let entry = match CacheEntry::new(&key, value, ttl) {
            Ok(entry) => entry,
            Err(err) => return Err(self.reject(err)),
        };

        if self.max_entry_size > 0 && entry.size > self.max_entry_size {
            return Err(self.reject(CacheError::EntryTooLarge {
                key,
                size: entry.size,
                max: self.max_entry_size,
            }));
        }

        if entry.size > self.max_size {
            return Err(self.reject(CacheError::ExceedsCapacity {
                key,
                size: entry.size,
                max: self.max_size,
            }));
        }

        let outcome = match self.entries.get_mut(&key) {
            Some(existing) if existing.value == entry.value => {
                existing.refresh_deadline();
                return Ok(SetOutcome::Refreshed);
            }
            Some(_) => SetOutcome::Replaced,
            None => SetOutcome::Inserted,
        };

        if outcome == SetOutcome::Replaced {
            self.remove(&key);
        }
        self.admit(key, entry);

        Ok(outcome)
    }

    // == Remove ==
    /// Removes an entry by key, returning it. No-op if absent.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.total_size -= entry.size;
        Some(entry)
    }

    // == Items ==
    /// Number of entries in the store, including expired ones not yet purged.
    pub fn items(&self) -> usize {
        self.entries.len()
    }

    // == Reset ==
    /// Removes every entry.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.total_size = 0;
    }

    // == Purge Expired ==
    /// Removes all entries past their deadline.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.remove(&key);
        }

        self.stats.record_expirations(count);
        count
    }

    // == Accessors ==
    /// Sum of the sizes of all stored entries, in bytes.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn max_entry_size(&self) -> usize {
        self.max_entry_size
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys currently stored, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries currently stored, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CacheEntry<V>)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    // == Stats ==
    /// Returns a snapshot of the store statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_occupancy(self.entries.len(), self.total_size);
        stats
    }

    // == Internals ==
    /// Evicts until the entry fits, then inserts it.
    fn admit(&mut self, key: String, entry: CacheEntry<V>) {
        while self.total_size + entry.size > self.max_size {
            if !self.evict_lowest() {
                break;
            }
        }

        self.total_size += entry.size;
        self.entries.insert(key, entry);
    }

    /// Evicts the entry with the least remaining TTL. Returns false if empty.
    fn evict_lowest(&mut self) -> bool {
        let Some(key) = lowest_remaining_ttl(&self.entries).map(str::to_owned) else {
            return false;
        };

        if let Some(evicted) = self.remove(&key) {
            debug!(key = %key, size = evicted.size, "evicted entry to make room");
            self.stats.record_eviction();
        }
        true
    }

    fn reject(&mut self, err: CacheError) -> CacheError {
        debug!(error = %err, "set rejected");
        self.stats.record_rejection();
        err
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BYTES_PER_MB;
    use std::thread::sleep;
    use std::time::Duration;

    fn store_mb() -> CacheStore<String> {
        CacheStore::new(100 * BYTES_PER_MB, 2 * BYTES_PER_MB, 60)
    }

    #[test]
    fn test_store_new() {
        let store = store_mb();
        assert_eq!(store.items(), 0);
        assert_eq!(store.total_size(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = store_mb();

        assert!(store.set("hello", "world".to_string(), None));
        let entry = store.get("hello", false).unwrap();

        assert_eq!(entry.value, "world");
        assert_eq!(entry.ttl, 60);
        assert_eq!(store.total_size(), 5);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store_mb();
        assert!(store.get("nope", false).is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_ttl_override() {
        let mut store = store_mb();

        store.set("test", "123".to_string(), Some(10));
        let entry = store.get("test", false).unwrap();
        assert_eq!(entry.ttl, 10);
        assert_eq!(entry.size, 3);
    }

    #[test]
    fn test_silent_get_keeps_deadline() {
        let mut store = store_mb();
        store.set("hello", "world".to_string(), None);

        let before = store.get("hello", true).unwrap().expires_at;
        sleep(Duration::from_millis(20));
        let after = store.get("hello", true).unwrap().expires_at;
        assert_eq!(before, after);

        let refreshed = store.get("hello", false).unwrap().expires_at;
        assert!(refreshed > before);
    }

    #[test]
    fn test_get_returns_expired_unswept_entry() {
        let mut store = store_mb();
        store.set("k", "v".to_string(), Some(1));
        sleep(Duration::from_millis(1100));

        let entry = store.get("k", true).unwrap();
        assert!(entry.is_expired());
        assert_eq!(store.items(), 1);

        // a non-silent get revives it
        assert!(!store.get("k", false).unwrap().is_expired());
    }

    #[test]
    fn test_set_same_value_refreshes() {
        let mut store = store_mb();
        store.set("k", "abc".to_string(), Some(5));
        let before = store.get("k", true).unwrap().expires_at;
        sleep(Duration::from_millis(20));

        let outcome = store.try_set("k", "abc".to_string(), Some(500)).unwrap();
        assert_eq!(outcome, SetOutcome::Refreshed);

        let entry = store.get("k", true).unwrap();
        assert!(entry.expires_at > before);
        // refresh keeps the entry's own ttl
        assert_eq!(entry.ttl, 5);
        assert_eq!(store.total_size(), 3);
        assert_eq!(store.items(), 1);
    }

    #[test]
    fn test_set_different_value_replaces() {
        let mut store = store_mb();
        store.set("k", "abc".to_string(), None);
        store.set("other", "zz".to_string(), None);

        let outcome = store.try_set("k", "abcdefg".to_string(), Some(9)).unwrap();
        assert_eq!(outcome, SetOutcome::Replaced);

        let entry = store.get("k", true).unwrap();
        assert_eq!(entry.value, "abcdefg");
        assert_eq!(entry.ttl, 9);
        assert_eq!(store.total_size(), 9);
        assert_eq!(store.items(), 2);
    }

    #[test]
    fn test_entry_too_large_rejected() {
        let mut store: CacheStore<String> = CacheStore::new(1024, 4, 60);
        store.set("keep", "ab".to_string(), None);

        let result = store.try_set("big", "abcde".to_string(), None);
        assert_eq!(
            result,
            Err(CacheError::EntryTooLarge {
                key: "big".to_string(),
                size: 5,
                max: 4
            })
        );
        assert!(!store.has_key("big"));
        assert_eq!(store.total_size(), 2);
        assert_eq!(store.stats().rejections, 1);
    }

    #[test]
    fn test_replacement_too_large_keeps_old_value() {
        let mut store: CacheStore<String> = CacheStore::new(1024, 4, 60);
        store.set("k", "ab".to_string(), None);

        assert!(!store.set("k", "abcdef".to_string(), None));
        assert_eq!(store.get("k", true).unwrap().value, "ab");
        assert_eq!(store.total_size(), 2);
    }

    #[test]
    fn test_unlimited_entry_size() {
        let mut store: CacheStore<String> = CacheStore::new(1024, 0, 60);
        assert!(store.set("big", "x".repeat(1000), None));
        assert_eq!(store.total_size(), 1000);
    }

    #[test]
    fn test_unmeasurable_rejected() {
        let mut store: CacheStore<Option<String>> = CacheStore::new(1024, 0, 60);

        let result = store.try_set("none", None, None);
        assert_eq!(result, Err(CacheError::SizeUnmeasurable("none".to_string())));
        assert!(store.is_empty());
    }

    #[test]
    fn test_one_byte_budget_evicts_previous() {
        let mut store: CacheStore<String> = CacheStore::new(1, 0, 60);

        assert!(store.set("a", "x".to_string(), None));
        assert!(store.set("b", "y".to_string(), None));

        assert!(!store.has_key("a"));
        assert!(store.has_key("b"));
        assert_eq!(store.total_size(), 1);
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_eviction_follows_remaining_ttl() {
        let mut store: CacheStore<String> = CacheStore::new(6, 0, 60);

        store.set("long", "aa".to_string(), Some(300));
        store.set("short", "bb".to_string(), Some(10));
        store.set("mid", "cc".to_string(), Some(100));

        // reads do not protect an entry
        store.get("short", false);

        store.set("new", "dd".to_string(), Some(200));
        assert!(!store.has_key("short"));
        assert!(store.has_key("mid"));

        store.set("newer", "ee".to_string(), Some(200));
        assert!(!store.has_key("mid"));
        assert!(store.has_key("long"));
        assert_eq!(store.total_size(), 6);
    }

    #[test]
    fn test_eviction_frees_enough_for_large_value() {
        let mut store: CacheStore<String> = CacheStore::new(10, 0, 60);
        store.set("a", "aaa".to_string(), Some(1));
        store.set("b", "bbb".to_string(), Some(2));
        store.set("c", "ccc".to_string(), Some(3));

        assert!(store.set("big", "x".repeat(8), Some(60)));
        assert_eq!(store.items(), 1);
        assert_eq!(store.total_size(), 8);
        assert_eq!(store.stats().evictions, 3);
    }

    #[test]
    fn test_value_larger_than_budget_rejected() {
        let mut store: CacheStore<String> = CacheStore::new(4, 0, 60);
        store.set("a", "aa".to_string(), None);

        let result = store.try_set("huge", "x".repeat(5), None);
        assert!(matches!(result, Err(CacheError::ExceedsCapacity { size: 5, max: 4, .. })));
        assert!(store.has_key("a"));
        assert_eq!(store.total_size(), 2);
    }

    #[test]
    fn test_store_remove() {
        let mut store = store_mb();
        store.set("k", "value".to_string(), None);

        let removed = store.remove("k").unwrap();
        assert_eq!(removed.value, "value");
        assert_eq!(store.total_size(), 0);
        assert!(store.remove("k").is_none());
    }

    #[test]
    fn test_store_keys() {
        let mut store = store_mb();
        store.set("a", "1".to_string(), None);
        store.set("b", "2".to_string(), None);

        let mut keys: Vec<&str> = store.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_store_reset() {
        let mut store = store_mb();
        store.set("hello", "world".to_string(), None);
        store.set("test", "123".to_string(), Some(10));
        assert_eq!(store.items(), 2);

        store.reset();
        assert_eq!(store.items(), 0);
        assert_eq!(store.total_size(), 0);
    }

    #[test]
    fn test_store_purge_expired() {
        let mut store = store_mb();
        store.set("short", "v1".to_string(), Some(1));
        store.set("long", "v2".to_string(), Some(10));

        sleep(Duration::from_millis(1100));

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.items(), 1);
        assert!(store.has_key("long"));
        assert_eq!(store.total_size(), 2);
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_stats() {
        let mut store = store_mb();
        store.set("k", "abcd".to_string(), None);
        store.get("k", false);
        store.get("missing", false);

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.total_size, 4);
    }

    #[test]
    fn test_store_from_config() {
        let store: CacheStore<Vec<u8>> = CacheStore::from_config(&CacheConfig::new(1, 0, 15, 0));
        assert_eq!(store.max_size(), BYTES_PER_MB);
        assert_eq!(store.max_entry_size(), 0);
        assert_eq!(store.default_ttl(), 15);
    }
}
