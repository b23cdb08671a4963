//! Recency Cache Module
//!
//! Bounded key-value store combining HashMap storage with LRU tracking.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::cache::{CacheEntry, CacheStats, RecencyIndex};

// == Recency Cache ==
/// Bounded cache with least-recently-used eviction.
///
/// Every successful `get` or `set` stamps the entry with the next tick of a
/// per-cache monotonic clock; when a new key arrives at capacity the entry
/// with the oldest stamp is evicted. No operation fails.
#[derive(Debug)]
pub struct RecencyCache<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access index, same key set as `entries`
    recency: RecencyIndex<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed, fixed for the cache's lifetime
    capacity: usize,
    /// Last tick handed out
    clock: u64,
}

impl<K, V> RecencyCache<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a new cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            recency: RecencyIndex::new(),
            stats: CacheStats::new(capacity),
            capacity,
            clock: 0,
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// A miss leaves the cache untouched.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if !self.entries.contains_key(key) {
            self.stats.record_miss();
            return None;
        }

        let tick = self.next_tick();
        let entry = self.entries.get_mut(key)?;
        let previous = entry.touch(tick);
        self.recency.retick(previous, tick);
        self.stats.record_hit();
        Some(&entry.value)
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// If the key already exists, the value is overwritten and its recency
    /// refreshed. If the key is new and the cache is at capacity, the least
    /// recently used entry is evicted first and its key returned.
    pub fn set(&mut self, key: K, value: V) -> Option<K> {
        let tick = self.next_tick();

        if let Some(entry) = self.entries.get_mut(&key) {
            let previous = entry.touch(tick);
            entry.value = value;
            self.recency.retick(previous, tick);
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        self.recency.insert(tick, key.clone());
        self.entries.insert(key, CacheEntry::new(value, tick));
        self.stats.set_total_entries(self.entries.len());

        evicted
    }

    // == Has ==
    /// Membership check; does not affect recency.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    // == Delete ==
    /// Removes an entry by key, returning whether anything was removed.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.entries.remove(key) {
            Some(entry) => {
                self.recency.remove(entry.last_accessed);
                self.stats.set_total_entries(self.entries.len());
                true
            }
            None => false,
        }
    }

    // == Delete By Predicate ==
    /// Removes every entry whose key satisfies `predicate`.
    ///
    /// Removal order is unspecified. Returns the number of entries removed.
    pub fn delete_by_predicate<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&K) -> bool,
    {
        let doomed: Vec<K> = self
            .entries
            .keys()
            .filter(|key| predicate(*key))
            .cloned()
            .collect();

        let removed = doomed.iter().filter(|key| self.delete(*key)).count();
        self.stats.record_invalidations(removed);
        removed
    }

    // == Keys ==
    /// Snapshot of the current keys, in no meaningful order.
    pub fn keys(&self) -> Vec<K> {
        self.entries.keys().cloned().collect()
    }

    // == Peek Oldest ==
    /// The key that the next eviction would remove.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.recency.peek_oldest()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Evict Oldest ==
    /// Removes the least recently used entry. No-op on an empty cache.
    fn evict_oldest(&mut self) -> Option<K> {
        let key = self.recency.evict_oldest()?;
        self.entries.remove(&key);
        self.stats.record_eviction();
        Some(key)
    }

    #[cfg(test)]
    pub(crate) fn recency_len(&self) -> usize {
        self.recency.len()
    }
}
