//! LRU Recency Index Module
//!
//! Implements Least Recently Used ordering for cache eviction.

use std::collections::BTreeMap;

// == Recency Index ==
/// Orders keys by the tick of their last access.
///
/// Keys are stored in a BTreeMap keyed by tick where:
/// - First entry = Least recently used
/// - Last entry = Most recently used
///
/// Ticks are unique per cache, so eviction never has to break ties.
#[derive(Debug)]
pub struct RecencyIndex<K> {
    /// Keys by access tick
    order: BTreeMap<u64, K>,
}

impl<K> Default for RecencyIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RecencyIndex<K> {
    // == Constructor ==
    /// Creates a new empty recency index.
    pub fn new() -> Self {
        Self {
            order: BTreeMap::new(),
        }
    }

    // == Insert ==
    /// Tracks a new key as accessed at `tick`.
    pub fn insert(&mut self, tick: u64, key: K) {
        self.order.insert(tick, key);
    }

    // == Retick ==
    /// Moves the key stamped `old` to `new` (marks it most recently used).
    pub fn retick(&mut self, old: u64, new: u64) {
        if let Some(key) = self.order.remove(&old) {
            self.order.insert(new, key);
        }
    }

    // == Remove ==
    /// Stops tracking the key stamped `tick`.
    pub fn remove(&mut self, tick: u64) -> Option<K> {
        self.order.remove(&tick)
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if the index is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        self.order.pop_first().map(|(_, key)| key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.first_key_value().map(|(_, key)| key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}
