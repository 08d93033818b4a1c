//! Spreadsheet file format.
//!
//! A sheet is stored as XML:
//!
//! ```xml
//! <spreadsheet version="default">
//!   <cell name="A1" contents="10"/>
//!   <cell name="B1" contents="=A1 * 2"/>
//! </spreadsheet>
//! ```
//!
//! `contents` is the string that recreates the cell through
//! `set_contents_of_cell`, so formulas keep their leading `=`.

mod parser;
mod writer;

pub use parser::{parse_sheet, parse_sheet_content};
pub use writer::{write_sheet, write_sheet_content};

/// A parsed sheet file, before any cell is validated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SheetDocument {
    pub version: String,
    pub cells: Vec<CellEntry>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CellEntry {
    pub name: String,
    pub contents: String,
}
