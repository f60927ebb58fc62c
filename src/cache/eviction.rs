//! Eviction Module
//!
//! Capacity eviction picks the entry closest to (or furthest past) its deadline.
//! This is TTL-proximity eviction; reads do not reorder anything.

use std::collections::HashMap;

use crate::cache::CacheEntry;

// == Lowest Remaining TTL ==
/// Returns the key of the entry with the least remaining TTL.
///
/// Remaining TTL is `expires_at - now` with the same `now` for every entry,
/// so comparing deadlines directly gives the same order. Ties resolve to
/// whichever key iteration reaches first. Returns None if there are no entries.
pub fn lowest_remaining_ttl<V>(entries: &HashMap<String, CacheEntry<V>>) -> Option<&str> {
    entries
        .iter()
        .min_by_key(|(_, entry)| entry.expires_at)
        .map(|(key, _)| key.as_str())
}
