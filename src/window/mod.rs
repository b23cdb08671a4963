//! Page Windowing Module
//!
//! Slices a sheet into bounded pages: computes each page's sub-range,
//! clips columns, filters merges and extracts the cells inside.

mod extract;
mod page;


pub use extract::extract_page;
pub use page::{compute_window, PageRequest, PageWindow};
