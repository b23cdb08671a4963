//! Configuration Module
//!
//! Handles loading cache and pagination limits from environment variables.

use std::env;
use std::str::FromStr;

const DEFAULT_WORKBOOK_CACHE_CAPACITY: usize = 10;
const DEFAULT_PAGE_CACHE_CAPACITY: usize = 255;
const DEFAULT_ROWS_PER_PAGE: u32 = 1000;
const DEFAULT_MAX_COLUMNS: u32 = 100;
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_WATCH_INTERVAL_MS: u64 = 500;

/// Viewer configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of parsed workbooks kept in memory
    pub workbook_cache_capacity: usize,
    /// Maximum number of extracted pages kept in memory
    pub page_cache_capacity: usize,
    /// Rows per page when a request does not specify one
    pub rows_per_page: u32,
    /// Column clip when a request does not specify one
    pub max_columns: u32,
    /// HTTP server port
    pub server_port: u16,
    /// Poll interval of the filesystem change watcher in milliseconds
    pub watch_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `WORKBOOK_CACHE_CAPACITY` - Cached workbooks (default: 10)
    /// - `PAGE_CACHE_CAPACITY` - Cached pages (default: 255)
    /// - `ROWS_PER_PAGE` - Default page height (default: 1000)
    /// - `MAX_COLUMNS` - Default column clip (default: 100)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `WATCH_INTERVAL_MS` - Change watcher poll interval (default: 500)
    ///
    /// Zero is not a usable capacity or page size, so a zero value falls
    /// back to the default just like an unparsable one.
    pub fn from_env() -> Self {
        Self {
            workbook_cache_capacity: positive_var("WORKBOOK_CACHE_CAPACITY")
                .unwrap_or(DEFAULT_WORKBOOK_CACHE_CAPACITY),
            page_cache_capacity: positive_var("PAGE_CACHE_CAPACITY")
                .unwrap_or(DEFAULT_PAGE_CACHE_CAPACITY),
            rows_per_page: positive_var("ROWS_PER_PAGE").unwrap_or(DEFAULT_ROWS_PER_PAGE),
            max_columns: positive_var("MAX_COLUMNS").unwrap_or(DEFAULT_MAX_COLUMNS),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            watch_interval_ms: positive_var("WATCH_INTERVAL_MS")
                .unwrap_or(DEFAULT_WATCH_INTERVAL_MS),
        }
    }
}

fn positive_var<T>(name: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v > T::default())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workbook_cache_capacity: DEFAULT_WORKBOOK_CACHE_CAPACITY,
            page_cache_capacity: DEFAULT_PAGE_CACHE_CAPACITY,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            max_columns: DEFAULT_MAX_COLUMNS,
            server_port: DEFAULT_SERVER_PORT,
            watch_interval_ms: DEFAULT_WATCH_INTERVAL_MS,
        }
    }
}
