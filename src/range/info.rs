//! Range descriptor parsing (`A1:Z100`).

use serde::Serialize;

use super::codec::{number_to_column_label, parse_cell_ref};

// == Range Info ==
/// Bounds of a rectangular range. Rows and column numbers are 1-based and
/// inclusive; `start <= end` on both axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeInfo {
    pub start_row: u32,
    pub end_row: u32,
    pub start_col: String,
    pub end_col: String,
    pub start_col_num: u32,
    pub end_col_num: u32,
    pub total_rows: u32,
    pub total_cols: u32,
}

impl RangeInfo {
    /// Builds a range from numeric bounds, deriving labels and totals.
    ///
    /// Returns None when either axis is reversed or a bound is zero.
    pub fn from_bounds(start_row: u32, end_row: u32, start_col_num: u32, end_col_num: u32) -> Option<Self> {
        if start_row == 0 || start_col_num == 0 || start_row > end_row || start_col_num > end_col_num {
            return None;
        }
        Some(Self {
            start_row,
            end_row,
            start_col: number_to_column_label(start_col_num),
            end_col: number_to_column_label(end_col_num),
            start_col_num,
            end_col_num,
            total_rows: end_row - start_row + 1,
            total_cols: end_col_num - start_col_num + 1,
        })
    }

    /// Renders the range back to `A1:B2` form.
    pub fn to_descriptor(&self) -> String {
        format!(
            "{}{}:{}{}",
            self.start_col, self.start_row, self.end_col, self.end_row
        )
    }

    /// Number of pages of `rows_per_page` rows needed to cover the range.
    pub fn page_count(&self, rows_per_page: u32) -> u32 {
        self.total_rows.div_ceil(rows_per_page.max(1))
    }
}

// == Parse Range ==
/// Parses a range descriptor like `A1:C10`.
///
/// Returns None ("no range") when the descriptor is empty, has no `:`, or
/// either side is not a well-formed cell reference. A reversed range
/// (`C10:A1`) is also treated as malformed.
pub fn parse_range(descriptor: &str) -> Option<RangeInfo> {
    let (start, end) = descriptor.trim().split_once(':')?;
    let start = parse_cell_ref(start)?;
    let end = parse_cell_ref(end)?;

    RangeInfo::from_bounds(start.row, end.row, start.col, end.col)
}
