//! CSV/TSV parser that produces a [`Workbook`] with a single sheet.

use crate::error::ParseError;
use crate::models::{Cell, CellValue, Sheet, Workbook};
use crate::range::format_cell_ref;
use crate::source::{FormatHint, WorkbookParser};

/// Name given to the only sheet of a delimited file
pub const DELIMITED_SHEET_NAME: &str = "Sheet1";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parser for comma- and tab-separated text. Other formats are rejected
/// with a [`ParseError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedParser;

impl WorkbookParser for DelimitedParser {
    fn parse(&self, bytes: &[u8], hint: &FormatHint) -> Result<Workbook, ParseError> {
        let sep = match hint {
            FormatHint::Csv => b',',
            FormatHint::Tsv => b'\t',
            other => {
                return Err(ParseError::new(format!(
                    "unsupported format '{}'",
                    other.as_str()
                )))
            }
        };
        parse_delimited(bytes, sep)
    }
}

fn parse_delimited(data: &[u8], sep: u8) -> Result<Workbook, ParseError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sep)
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut sheet = Sheet::new(DELIMITED_SHEET_NAME);
    let mut max_row: u32 = 0;
    let mut max_col: u32 = 0;

    // One record is one row, however many lines its quoted fields span
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.map_err(|err| {
            ParseError::new(format!("malformed record {}: {}", row_idx + 1, err))
        })?;
        let row = row_idx as u32 + 1;
        for (col_idx, field) in record.iter().enumerate() {
            let field = String::from_utf8_lossy(field);
            let value = field.trim();
            if value.is_empty() {
                continue;
            }
            let col = col_idx as u32 + 1;

            let cell = match value.parse::<f64>() {
                Ok(n) if n.is_finite() => Cell {
                    value: CellValue::Number(n),
                    display: Some(value.to_string()),
                },
                _ => Cell::text(value),
            };
            sheet.cells.insert(format_cell_ref(col, row), cell);

            max_row = max_row.max(row);
            max_col = max_col.max(col);
        }
    }

    if !sheet.cells.is_empty() {
        sheet.range = Some(format!("A1:{}", format_cell_ref(max_col, max_row)));
    }

    let mut workbook = Workbook::new();
    workbook.push_sheet(sheet);
    Ok(workbook)
}
