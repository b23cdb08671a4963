//! Parsed workbook model
//!
//! The shape a workbook parser hands to the engine: named sheets holding a
//! sparse grid of cells addressed by `A1`-style strings, plus sheet-level
//! metadata (range, sizing, merges).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::window::PageWindow;

/// Content of a single cell, carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v", rename_all = "lowercase")]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    /// Formatted text as the source application displayed it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            display: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(CellValue::Text(text.into()))
    }

    pub fn number(n: f64) -> Self {
        Self::new(CellValue::Number(n))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub width: Option<f64>,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowInfo {
    pub height: Option<f64>,
    #[serde(default)]
    pub hidden: bool,
}

/// Merged rectangle, 1-based and inclusive on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRegion {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl MergeRegion {
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }
}

// == Sheet ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    /// Range descriptor covering the used cells, e.g. `A1:Z100`
    pub range: Option<String>,
    pub col_info: Option<Vec<ColumnInfo>>,
    pub row_info: Option<Vec<RowInfo>>,
    pub merges: Option<Vec<MergeRegion>>,
    /// Sparse cell map keyed by address (`B7`)
    pub cells: HashMap<String, Cell>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

// == Workbook ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// Sheet names in workbook order
    pub sheet_names: Vec<String>,
    pub sheets: HashMap<String, Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sheet, keeping `sheet_names` in insertion order.
    /// A sheet with an existing name replaces the old one in place.
    pub fn push_sheet(&mut self, sheet: Sheet) {
        if !self.sheets.contains_key(&sheet.name) {
            self.sheet_names.push(sheet.name.clone());
        }
        self.sheets.insert(sheet.name.clone(), sheet);
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.sheet_names.is_empty()
    }
}

// == Sheet Page ==
/// One page of a sheet: the sub-range selected by a [`PageWindow`] with the
/// metadata and cells that fall inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetPage {
    /// Range descriptor of this page, e.g. `A101:CV200`
    pub range: String,
    pub window: PageWindow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_info: Option<Vec<ColumnInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_info: Option<Vec<RowInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merges: Option<Vec<MergeRegion>>,
    pub cells: HashMap<String, Cell>,
}
