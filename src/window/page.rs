//! Page requests and the windows they select.

use serde::{Deserialize, Serialize};

use crate::models::MergeRegion;
use crate::range::{number_to_column_label, RangeInfo};

// == Page Request ==
/// Which page of which sheet to show, and how large pages are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub sheet_name: String,
    /// 0-based page index
    pub page: u32,
    pub rows_per_page: u32,
    pub max_columns: u32,
}

impl PageRequest {
    /// Creates a request; page sizes below one are raised to one.
    pub fn new(sheet_name: impl Into<String>, page: u32, rows_per_page: u32, max_columns: u32) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            page,
            rows_per_page: rows_per_page.max(1),
            max_columns: max_columns.max(1),
        }
    }
}

// == Page Window ==
/// Inclusive 1-based bounds of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub start_row: u32,
    pub end_row: u32,
    pub start_col_num: u32,
    pub end_col_num: u32,
}

impl PageWindow {
    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.start_row..=self.end_row).contains(&row)
            && (self.start_col_num..=self.end_col_num).contains(&col)
    }

    /// True only when the whole region lies inside the window.
    pub fn contains_region(&self, region: &MergeRegion) -> bool {
        self.contains(region.start_row, region.start_col)
            && self.contains(region.end_row, region.end_col)
    }

    pub fn row_count(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    pub fn col_count(&self) -> u32 {
        self.end_col_num - self.start_col_num + 1
    }

    pub fn to_descriptor(&self) -> String {
        format!(
            "{}{}:{}{}",
            number_to_column_label(self.start_col_num),
            self.start_row,
            number_to_column_label(self.end_col_num),
            self.end_row
        )
    }
}

// == Compute Window ==
/// Computes the rows and clipped columns of `request.page` within `range`.
///
/// A page past the end of the data clamps to the last row instead of
/// producing an empty window, so the result always satisfies
/// `start_row <= end_row <= range.end_row`.
pub fn compute_window(range: &RangeInfo, request: &PageRequest) -> PageWindow {
    let rows_per_page = request.rows_per_page.max(1);
    let max_columns = request.max_columns.max(1);

    let offset = request.page.saturating_mul(rows_per_page);
    let start_row = range.start_row.saturating_add(offset).min(range.end_row);
    let end_row = start_row
        .saturating_add(rows_per_page - 1)
        .min(range.end_row);
    let end_col_num = range
        .end_col_num
        .min(range.start_col_num.saturating_add(max_columns - 1));

    PageWindow {
        start_row,
        end_row,
        start_col_num: range.start_col_num,
        end_col_num,
    }
}
