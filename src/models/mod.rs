//! Data models
//!
//! The parsed workbook shapes the engine pages over, and the DTOs used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;
pub mod sheet;

pub use requests::{DocumentRequest, PageQuery};
pub use responses::{
    CacheStatsResponse, CloseResponse, DocumentResponse, HealthResponse, SheetDataResponse,
    StatsResponse,
};
pub use sheet::{Cell, CellValue, ColumnInfo, MergeRegion, RowInfo, Sheet, SheetPage, Workbook};
