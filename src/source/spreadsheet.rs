//! Spreadsheet parser for xlsx, xls and ods documents, backed by calamine.
//!
//! Every worksheet becomes a [`Sheet`] whose range covers the cells calamine
//! reports. Merged regions are read where the format exposes them (xlsx
//! and xls). Column and row sizing are not available from calamine, so
//! those fields stay empty.

use std::fmt::Display;
use std::io::{Cursor, Read, Seek};

use calamine::{open_workbook_from_rs, Data, Dimensions, Ods, Range, Reader, Xls, Xlsx};

use crate::error::ParseError;
use crate::models::{Cell, CellValue, MergeRegion, Sheet, Workbook};
use crate::range::format_cell_ref;
use crate::source::{FormatHint, WorkbookParser};

#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetParser;

impl WorkbookParser for SpreadsheetParser {
    fn parse(&self, bytes: &[u8], hint: &FormatHint) -> Result<Workbook, ParseError> {
        let cursor = Cursor::new(bytes.to_vec());
        match hint {
            FormatHint::Xlsx => {
                let mut book: Xlsx<_> =
                    open_workbook_from_rs(cursor).map_err(|err| parse_error(hint, err))?;
                book.load_merged_regions()
                    .map_err(|err| parse_error(hint, err))?;
                read_sheets(&mut book, hint, |book, name| {
                    book.worksheet_merge_cells(name)
                        .and_then(Result::ok)
                        .unwrap_or_default()
                })
            }
            FormatHint::Xls => {
                let mut book: Xls<_> =
                    open_workbook_from_rs(cursor).map_err(|err| parse_error(hint, err))?;
                read_sheets(&mut book, hint, |book, name| {
                    book.worksheet_merge_cells(name).unwrap_or_default()
                })
            }
            FormatHint::Ods => {
                let mut book: Ods<_> =
                    open_workbook_from_rs(cursor).map_err(|err| parse_error(hint, err))?;
                read_sheets(&mut book, hint, |_, _| Vec::new())
            }
            other => Err(ParseError::new(format!(
                "unsupported format '{}'",
                other.as_str()
            ))),
        }
    }
}

fn parse_error(hint: &FormatHint, err: impl Display) -> ParseError {
    ParseError::new(format!("invalid {} document: {}", hint.as_str(), err))
}

fn read_sheets<RS, R, F>(
    book: &mut R,
    hint: &FormatHint,
    merges_of: F,
) -> Result<Workbook, ParseError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
    F: Fn(&mut R, &str) -> Vec<Dimensions>,
{
    let mut workbook = Workbook::new();
    for name in book.sheet_names().to_vec() {
        let range = book
            .worksheet_range(&name)
            .map_err(|err| parse_error(hint, format!("sheet '{name}': {err}")))?;
        let merges = merges_of(book, &name);
        workbook.push_sheet(convert_sheet(name, &range, &merges));
    }
    Ok(workbook)
}

fn convert_sheet(name: String, range: &Range<Data>, merges: &[Dimensions]) -> Sheet {
    let mut sheet = Sheet::new(name);

    // calamine positions are 0-based and relative to the range start
    if let (Some((start_row, start_col)), Some((end_row, end_col))) =
        (range.start(), range.end())
    {
        for (row, col, data) in range.used_cells() {
            let Some(cell) = convert_cell(data) else {
                continue;
            };
            let address =
                format_cell_ref(col as u32 + start_col + 1, row as u32 + start_row + 1);
            sheet.cells.insert(address, cell);
        }
        sheet.range = Some(format!(
            "{}:{}",
            format_cell_ref(start_col + 1, start_row + 1),
            format_cell_ref(end_col + 1, end_row + 1)
        ));
    }

    if !merges.is_empty() {
        sheet.merges = Some(
            merges
                .iter()
                .map(|merge| {
                    MergeRegion::new(
                        merge.start.0 + 1,
                        merge.start.1 + 1,
                        merge.end.0 + 1,
                        merge.end.1 + 1,
                    )
                })
                .collect(),
        );
    }
    sheet
}

/// Empty cells and empty strings produce no cell.
fn convert_cell(data: &Data) -> Option<Cell> {
    let cell = match data {
        Data::Empty => return None,
        Data::String(s) if s.is_empty() => return None,
        Data::String(s) => Cell::text(s.clone()),
        Data::Float(f) => Cell::number(*f),
        Data::Int(i) => Cell {
            value: CellValue::Number(*i as f64),
            display: Some(i.to_string()),
        },
        Data::Bool(b) => Cell::new(CellValue::Bool(*b)),
        // Serial day number, as the source application stores it
        Data::DateTime(dt) => Cell::number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s.clone()),
        Data::Error(err) => Cell::text(err.to_string()),
    };
    Some(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two sheets: `Summary` with a merged title over A1:C1, and `Data`
    /// whose cells start at C3.
    const TWO_SHEETS: &[u8] = include_bytes!("../../tests/fixtures/two_sheets.xlsx");

    #[test]
    fn test_reads_sheets_in_order() {
        let wb = SpreadsheetParser.parse(TWO_SHEETS, &FormatHint::Xlsx).unwrap();
        assert_eq!(wb.sheet_names, vec!["Summary", "Data"]);
    }

    #[test]
    fn test_cells_and_range() {
        let wb = SpreadsheetParser.parse(TWO_SHEETS, &FormatHint::Xlsx).unwrap();
        let summary = wb.sheet("Summary").unwrap();

        assert_eq!(summary.range.as_deref(), Some("A1:C3"));
        assert_eq!(summary.cells.get("A1"), Some(&Cell::text("Quarterly report")));
        assert_eq!(summary.cells["B2"].value, CellValue::Number(42.0));
        assert_eq!(summary.cells["C3"].value, CellValue::Bool(true));
        assert_eq!(summary.cells.len(), 3);
    }

    #[test]
    fn test_offset_range_keeps_addresses() {
        let wb = SpreadsheetParser.parse(TWO_SHEETS, &FormatHint::Xlsx).unwrap();
        let data = wb.sheet("Data").unwrap();

        assert_eq!(data.range.as_deref(), Some("C3:D4"));
        assert_eq!(data.cells.get("C3"), Some(&Cell::text("x")));
        assert_eq!(data.cells["D4"].value, CellValue::Number(1.5));
        assert!(data.merges.is_none());
    }

    #[test]
    fn test_merged_regions_are_one_based() {
        let wb = SpreadsheetParser.parse(TWO_SHEETS, &FormatHint::Xlsx).unwrap();
        let summary = wb.sheet("Summary").unwrap();

        assert_eq!(summary.merges, Some(vec![MergeRegion::new(1, 1, 1, 3)]));
    }

    #[test]
    fn test_corrupt_archive_is_a_parse_error() {
        let err = SpreadsheetParser
            .parse(b"PK\x03\x04 not really a zip", &FormatHint::Xlsx)
            .unwrap_err();
        assert!(err.cause.starts_with("invalid xlsx document"));
    }

    #[test]
    fn test_delimited_hint_is_rejected() {
        let err = SpreadsheetParser.parse(b"a,b", &FormatHint::Csv).unwrap_err();
        assert_eq!(err.cause, "unsupported format 'csv'");
    }

    #[test]
    fn test_convert_cell() {
        assert_eq!(convert_cell(&Data::Empty), None);
        assert_eq!(convert_cell(&Data::String(String::new())), None);
        let int = convert_cell(&Data::Int(7)).unwrap();
        assert_eq!(int.value, CellValue::Number(7.0));
        assert_eq!(int.display.as_deref(), Some("7"));
        assert_eq!(
            convert_cell(&Data::DateTimeIso("2024-01-02".into())),
            Some(Cell::text("2024-01-02"))
        );
    }
}
