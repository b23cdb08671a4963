//! Response DTOs for the viewer API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::coordinator::{CoordinatorStats, PageResponse};

/// Response body for open and invalidate: the sheets of the (re)loaded workbook
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
    pub identity: String,
    pub sheet_names: Vec<String>,
}

impl DocumentResponse {
    pub fn new(identity: impl Into<String>, sheet_names: Vec<String>) -> Self {
        Self {
            identity: identity.into(),
            sheet_names,
        }
    }
}

/// Response body for POST /documents/page
#[derive(Debug, Clone, Serialize)]
pub struct SheetDataResponse {
    pub identity: String,
    #[serde(flatten)]
    pub page: PageResponse,
}

/// Response body for POST /documents/close
#[derive(Debug, Clone, Serialize)]
pub struct CloseResponse {
    pub message: String,
    pub identity: String,
}

impl CloseResponse {
    pub fn new(identity: impl Into<String>) -> Self {
        let identity = identity.into();
        Self {
            message: format!("Document '{}' closed", identity),
            identity,
        }
    }
}

/// Counters of one cache, with the derived hit rate
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub invalidations: u64,
    pub total_entries: usize,
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<&CacheStats> for CacheStatsResponse {
    fn from(stats: &CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            invalidations: stats.invalidations,
            total_entries: stats.total_entries,
            capacity: stats.capacity,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub workbooks: CacheStatsResponse,
    pub pages: CacheStatsResponse,
    pub open_documents: usize,
}

impl From<&CoordinatorStats> for StatsResponse {
    fn from(stats: &CoordinatorStats) -> Self {
        Self {
            workbooks: CacheStatsResponse::from(&stats.workbooks),
            pages: CacheStatsResponse::from(&stats.pages),
            open_documents: stats.open_documents,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
