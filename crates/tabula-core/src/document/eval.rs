use tabula_engine::engine::{Formula, FormulaError};

use super::Spreadsheet;
use super::cell::{CellContent, CellValue};
use crate::error::Result;

impl Spreadsheet {
    /// Recompute cached values in `order`. Names without a stored cell are skipped.
    pub(crate) fn recalculate(&mut self, order: &[String]) {
        for name in order {
            let Some(cell) = self.cells.get(name) else {
                continue;
            };
            let value = self.compute_value(&cell.content);
            if let Some(cell) = self.cells.get_mut(name) {
                cell.value = value;
            }
        }
    }

    fn compute_value(&self, content: &CellContent) -> CellValue {
        match content {
            CellContent::Number(n) => CellValue::Number(*n),
            CellContent::Text(s) => CellValue::Text(s.clone()),
            CellContent::Formula(formula) => self.evaluate_formula(formula).into(),
        }
    }

    /// Evaluate `formula` against the current cell values. Only numeric
    /// values resolve; empty, text and error cells are undefined.
    pub fn evaluate_formula(&self, formula: &Formula) -> std::result::Result<f64, FormulaError> {
        formula.evaluate(|name| self.cells.get(name).and_then(|cell| cell.value.as_number()))
    }

    /// Parse and evaluate a standalone expression without storing it.
    /// A leading `=` is optional.
    pub fn evaluate_expression(&self, expression: &str) -> Result<CellValue> {
        let expression = expression.strip_prefix('=').unwrap_or(expression);
        let formula = self.parse_formula(expression)?;
        Ok(self.evaluate_formula(&formula).into())
    }
}
