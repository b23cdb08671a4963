//! Composite cache keys.
//!
//! Workbook keys are `{identity}-{mtime}`; page keys extend a workbook key
//! with `-{sheet}-page-{page}-{rows}x{cols}`, so the same page index at a
//! different page size is a different entry. Keys are compared as plain strings. The
//! identity is assumed not to be ambiguous with respect to the delimiter,
//! which holds for normalized paths and URIs.

use crate::source::ModTime;
use crate::window::PageRequest;

pub const KEY_DELIMITER: char = '-';

/// Key of a parsed workbook: document identity plus modification time.
pub fn workbook_key(identity: &str, modified: ModTime) -> String {
    format!("{identity}{KEY_DELIMITER}{modified}")
}

/// Key of one page of one sheet of a cached workbook, at one page geometry.
pub fn page_key(workbook_key: &str, request: &PageRequest) -> String {
    format!(
        "{workbook_key}{KEY_DELIMITER}{}{KEY_DELIMITER}page{KEY_DELIMITER}{}{KEY_DELIMITER}{}x{}",
        request.sheet_name, request.page, request.rows_per_page, request.max_columns
    )
}

/// Whether `key` was derived from `identity` (workbook or page key).
pub fn belongs_to(key: &str, identity: &str) -> bool {
    key.strip_prefix(identity)
        .is_some_and(|rest| rest.starts_with(KEY_DELIMITER))
}
