//! Column label and cell reference arithmetic.
//!
//! Column labels are bijective base-26 numerals (`A`=1 … `Z`=26, `AA`=27).
//! Every function here is pure and total.

use serde::Serialize;

/// A parsed `A1`-style cell reference. Row and column are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellRef {
    pub column: String,
    pub col: u32,
    pub row: u32,
}

/// Convert a column label to its 1-based number.
///
/// Lowercase letters count as uppercase; anything that is not an ASCII
/// letter is ignored. Labels too long for `u32` saturate.
pub fn column_label_to_number(label: &str) -> u32 {
    label
        .bytes()
        .filter(u8::is_ascii_alphabetic)
        .fold(0u32, |acc, b| {
            let digit = u32::from(b.to_ascii_uppercase() - b'A') + 1;
            acc.saturating_mul(26).saturating_add(digit)
        })
}

/// Convert a 1-based column number to its label.
///
/// Precondition: `number >= 1`. Zero has no label and yields `"A"`, so a
/// caller passing zero silently gets column 1.
pub fn number_to_column_label(number: u32) -> String {
    let mut n = number;
    let mut label = Vec::new();
    while n > 0 {
        let modulo = (n - 1) % 26;
        label.push(b'A' + modulo as u8);
        n = (n - modulo) / 26;
    }
    if label.is_empty() {
        return "A".to_string();
    }
    label.reverse();
    label.into_iter().map(char::from).collect()
}

/// Parse a cell reference like `B12` or `$B$12`.
///
/// The reference must be letters followed by digits. Missing letters,
/// missing digits, trailing garbage and row 0 are rejected.
pub fn parse_cell_ref(reference: &str) -> Option<CellRef> {
    let reference = reference.trim();
    let reference = reference.strip_prefix('$').unwrap_or(reference);

    let letters_end = reference
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(reference.len());
    let (letters, rest) = reference.split_at(letters_end);
    let digits = rest.strip_prefix('$').unwrap_or(rest);

    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }

    let column = letters.to_ascii_uppercase();
    Some(CellRef {
        col: column_label_to_number(&column),
        column,
        row,
    })
}

/// Format a cell reference from a 1-based column number and row.
pub fn format_cell_ref(col: u32, row: u32) -> String {
    format!("{}{}", number_to_column_label(col), row)
}
