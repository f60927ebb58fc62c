//! Cache Statistics Module
//!
//! Tracks cache activity: hits, misses, evictions, expirations and occupancy.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache activity counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of gets that found the key
    pub hits: u64,
    /// Number of gets for absent keys
    pub misses: u64,
    /// Number of entries evicted to make room under the byte budget
    pub evictions: u64,
    /// Number of entries removed by purge sweeps
    pub expirations: u64,
    /// Number of sets refused (unmeasurable or oversized values)
    pub rejections: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Current number of occupied bytes
    pub total_size: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no gets have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_rejection(&mut self) {
        self.rejections += 1;
    }

    // == Update Occupancy ==
    /// Updates the entry count and byte total.
    pub fn set_occupancy(&mut self, entries: usize, size: usize) {
        self.total_entries = entries;
        self.total_size = size;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.expirations, 0);
        assert_eq!(stats.total_size, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_removals() {
        let mut stats = CacheStats::new();
        stats.record_eviction();
        stats.record_expirations(3);
        stats.record_rejection();
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.expirations, 3);
        assert_eq!(stats.rejections, 1);
    }

    #[test]
    fn test_stats_serialize() {
        let mut stats = CacheStats::new();
        stats.set_occupancy(2, 8);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_entries"], 2);
        assert_eq!(json["total_size"], 8);
    }
}
