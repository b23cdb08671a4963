//! Cache Module
//!
//! Provides a generic bounded in-memory cache with LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::RecencyIndex;
pub use stats::CacheStats;
pub use store::RecencyCache;
