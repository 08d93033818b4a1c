//! Cell data structures.
//!
//! - [`CellContent`] - What the user typed: a number, text, or a formula
//! - [`CellValue`] - What the cell evaluates to: a number, text, or an error
//! - [`Cell`] - Content plus its cached value

use std::fmt;
use tabula_engine::engine::{Formula, FormulaError, format_number};

/// The raw content of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContent {
    Number(f64),
    Text(String),
    Formula(Formula),
}

impl CellContent {
    /// Content of a cell that has never been set.
    pub fn empty() -> CellContent {
        CellContent::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Text(s) if s.is_empty())
    }

    /// The string that, passed back to `set_contents_of_cell`, reproduces
    /// this content.
    pub fn to_input_string(&self) -> String {
        match self {
            CellContent::Number(n) => n.to_string(),
            CellContent::Text(s) => s.clone(),
            CellContent::Formula(f) => format!("={}", f),
        }
    }
}

impl fmt::Display for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_input_string())
    }
}

/// The evaluated value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl CellValue {
    /// Value of a cell that has never been set.
    pub fn empty() -> CellValue {
        CellValue::Text(String::new())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) | CellValue::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }
}

impl From<Result<f64, FormulaError>> for CellValue {
    fn from(result: Result<f64, FormulaError>) -> Self {
        match result {
            Ok(n) => CellValue::Number(n),
            Err(e) => CellValue::Error(e),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

/// A non-empty cell in the spreadsheet.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub content: CellContent,
    /// Cached result of evaluating `content`. Kept current by recalculation.
    pub value: CellValue,
}

impl Cell {
    pub fn new(content: CellContent) -> Cell {
        let value = match &content {
            CellContent::Number(n) => CellValue::Number(*n),
            CellContent::Text(s) => CellValue::Text(s.clone()),
            // Placeholder until the first recalculation pass.
            CellContent::Formula(_) => CellValue::empty(),
        };
        Cell { content, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_string_round_trip_forms() {
        assert_eq!(CellContent::Number(10.0).to_input_string(), "10");
        assert_eq!(CellContent::Number(2.5).to_input_string(), "2.5");
        assert_eq!(
            CellContent::Text("Hello World".to_string()).to_input_string(),
            "Hello World"
        );
        let f = Formula::new("10+5").unwrap();
        assert_eq!(CellContent::Formula(f).to_input_string(), "=10 + 5");
    }

    #[test]
    fn test_empty_content() {
        assert!(CellContent::empty().is_empty());
        assert!(!CellContent::Text(" ".to_string()).is_empty());
        assert_eq!(CellValue::empty(), CellValue::Text(String::new()));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(CellValue::Number(15.0).to_string(), "15");
        assert_eq!(
            CellValue::Error(FormulaError::division_by_zero()).to_string(),
            "#ERR: division by zero"
        );
        assert_eq!(CellValue::from(Ok(2.5)), CellValue::Number(2.5));
    }
}
