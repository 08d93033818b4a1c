//! Spreadsheet state and logic (UI-agnostic).

mod cell;
mod eval;
mod io;
mod ops;
mod state;

pub use cell::{Cell, CellContent, CellValue};
pub use state::{DEFAULT_VERSION, Normalizer, Spreadsheet, Validator};
