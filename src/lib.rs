//! Sheet Pager - windowed pagination and caching for large spreadsheets
//!
//! Serves fixed-size pages of very large workbooks without re-parsing the
//! file on every navigation. Parsed workbooks and computed pages live in
//! two bounded LRU caches keyed by document identity and modification
//! time, and are invalidated per document when the file changes.

pub mod api;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod models;
pub mod range;
pub mod source;
pub mod tasks;
pub mod window;

pub use api::AppState;
pub use config::Config;
pub use coordinator::{CacheCoordinator, CacheLimits, PageContent, PageResponse};
pub use error::{ParseError, ViewerError};
pub use window::PageRequest;
