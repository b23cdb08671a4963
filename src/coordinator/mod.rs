//! Coordinator Module
//!
//! Ties the caches, the document sources and the windowing logic together
//! behind [`CacheCoordinator`].

pub mod keys;
mod service;
pub mod session;


pub use keys::{belongs_to, page_key, workbook_key};
pub use service::{CacheCoordinator, CacheLimits, CoordinatorStats, PageContent, PageResponse};
pub use session::{DocumentPhase, DocumentSession};
