//! Page extraction
//!
//! Builds a page-sized copy of a sheet. This walks every addressed cell of
//! the source sheet and is the hot path for wide or sparse sheets.

use std::collections::HashMap;

use crate::models::{Sheet, SheetPage};
use crate::range::parse_cell_ref;
use crate::window::PageWindow;

// == Extract Page ==
/// Copies the part of `sheet` selected by `window` into a new [`SheetPage`].
///
/// - column and row sizing are copied verbatim when present;
/// - merges are kept only when fully inside the window (a merge crossing a
///   page edge is dropped, not clipped);
/// - cells whose address falls inside the window are copied unchanged.
///   Cells with an unparsable address are skipped.
///
/// `window` must come from the parsed range of `sheet`; callers with no
/// range render an empty page instead of calling this.
pub fn extract_page(sheet: &Sheet, window: &PageWindow) -> SheetPage {
    let page_range = window.to_descriptor();

    let merges = sheet.merges.as_ref().map(|merges| {
        merges
            .iter()
            .filter(|merge| window.contains_region(merge))
            .copied()
            .collect()
    });

    let cells: HashMap<_, _> = sheet
        .cells
        .iter()
        .filter(|(address, _)| {
            parse_cell_ref(address).is_some_and(|cell| window.contains(cell.row, cell.col))
        })
        .map(|(address, cell)| (address.clone(), cell.clone()))
        .collect();

    SheetPage {
        range: page_range,
        window: *window,
        col_info: sheet.col_info.clone(),
        row_info: sheet.row_info.clone(),
        merges,
        cells,
    }
}
