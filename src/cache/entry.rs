//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with recency stamps.

// == Cache Entry ==
/// Represents a single cache entry with value and recency metadata.
///
/// `last_accessed` is a tick of the owning cache's monotonic clock, not a
/// wall-clock time, so two accesses never share a stamp.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Tick of the last successful read or write
    pub last_accessed: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with `tick`.
    pub fn new(value: V, tick: u64) -> Self {
        Self {
            value,
            last_accessed: tick,
        }
    }

    // == Touch ==
    /// Restamps the entry, returning the previous tick.
    pub fn touch(&mut self, tick: u64) -> u64 {
        std::mem::replace(&mut self.last_accessed, tick)
    }
}
