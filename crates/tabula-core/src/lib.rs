//! tabula-core - Spreadsheet document model + storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::{Cell, CellContent, CellValue, Normalizer, Spreadsheet, Validator};
pub use error::{Result, TabulaError};

pub use tabula_engine::engine::{Formula, FormulaError};
