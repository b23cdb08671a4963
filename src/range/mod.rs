//! Range Codec Module
//!
//! Stateless conversions between column labels and numbers, and parsing of
//! range descriptors into structured bounds.

mod codec;
mod info;


pub use codec::{
    column_label_to_number, format_cell_ref, number_to_column_label, parse_cell_ref, CellRef,
};
pub use info::{parse_range, RangeInfo};
