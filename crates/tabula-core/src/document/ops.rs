use log::{debug, warn};
use std::collections::{BTreeSet, HashSet};

use tabula_engine::engine::{Formula, is_cell_name};

use super::Spreadsheet;
use super::cell::{Cell, CellContent};
use crate::error::{Result, TabulaError};

impl Spreadsheet {
    /// Classify raw input the way `set_contents_of_cell` does:
    /// - Parses as a finite number -> Number
    /// - Starts with '=' -> Formula (the rest must be a valid expression)
    /// - Otherwise -> Text (possibly empty)
    pub fn parse_contents(&self, raw: &str) -> Result<CellContent> {
        if let Ok(n) = raw.trim().parse::<f64>() {
            if n.is_finite() {
                return Ok(CellContent::Number(n));
            }
        }

        if let Some(expression) = raw.strip_prefix('=') {
            return Ok(CellContent::Formula(self.parse_formula(expression)?));
        }

        Ok(CellContent::Text(raw.to_string()))
    }

    /// Build a formula whose variables follow this sheet's cell-name rules.
    pub fn parse_formula(&self, expression: &str) -> Result<Formula> {
        let formula = Formula::with_options(
            expression,
            |name| (self.normalizer)(name),
            |name| is_cell_name(name) && (self.validator)(name),
        )?;
        Ok(formula)
    }

    /// Set a cell from user input and recalculate everything that depends on it.
    ///
    /// Returns the names of all recalculated cells, the edited cell included.
    /// On any error the sheet is left exactly as it was.
    pub fn set_contents_of_cell(&mut self, name: &str, raw: &str) -> Result<BTreeSet<String>> {
        let name = self.normalize_name(name)?;
        let content = self.parse_contents(raw)?;
        let order = self.update_dependencies(&name, &content)?;

        if content.is_empty() {
            self.cells.remove(&name);
        } else {
            self.cells.insert(name.clone(), Cell::new(content));
        }

        self.recalculate(&order);
        self.changed = true;
        debug!("set {}: {} cell(s) recalculated", name, order.len());

        Ok(order.into_iter().collect())
    }

    /// Point `name`'s dependees at whatever `content` references and return
    /// the recalculation order. A cycle restores the previous dependees.
    fn update_dependencies(&mut self, name: &str, content: &CellContent) -> Result<Vec<String>> {
        let previous = self.graph.dependees(name);
        let referenced: &[String] = match content {
            CellContent::Formula(formula) => formula.variables(),
            CellContent::Number(_) | CellContent::Text(_) => &[],
        };
        self.graph.replace_dependees(name, referenced);

        match self.recalculation_order(&[name.to_string()]) {
            Ok(order) => Ok(order),
            Err(err) => {
                self.graph.replace_dependees(name, &previous);
                warn!("rejected edit of {}: {}", name, err);
                Err(err)
            }
        }
    }

    /// Order in which `names` and everything depending on them must be
    /// recalculated. Fails if any of them reaches itself.
    pub fn cells_to_recalculate<I, S>(&self, names: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| self.normalize_name(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.recalculation_order(&names)
    }

    pub(crate) fn recalculation_order(&self, starts: &[String]) -> Result<Vec<String>> {
        let mut visited = HashSet::new();
        let mut finished = Vec::new();

        for start in starts {
            if !visited.contains(start) {
                self.visit(start, &mut visited, &mut finished)?;
            }
        }

        // Reverse post-order puts every cell before its dependents.
        finished.reverse();
        Ok(finished)
    }

    /// Depth-first walk over dependents from `start`, appending each cell to
    /// `finished` once all of its dependents are done. The walk keeps its own
    /// frame stack so chain length is bounded by memory, not the thread stack.
    fn visit(
        &self,
        start: &str,
        visited: &mut HashSet<String>,
        finished: &mut Vec<String>,
    ) -> Result<()> {
        visited.insert(start.to_string());
        let mut stack = vec![self.frame(start)];

        loop {
            let Some(top) = stack.last_mut() else {
                return Ok(());
            };

            match top.next_dependent() {
                Some(dependent) if dependent == start => {
                    // The frames from the bottom up are the path back to `start`.
                    let mut cycle: Vec<String> =
                        stack.iter().map(|frame| frame.cell.clone()).collect();
                    cycle.push(dependent);
                    return Err(TabulaError::CircularDependency {
                        cell: start.to_string(),
                        cycle,
                    });
                }
                Some(dependent) => {
                    if visited.insert(dependent.clone()) {
                        stack.push(self.frame(&dependent));
                    }
                }
                None => {
                    if let Some(done) = stack.pop() {
                        finished.push(done.cell);
                    }
                }
            }
        }
    }

    fn frame(&self, cell: &str) -> Frame {
        let mut dependents: Vec<String> = self.graph.dependents(cell).into_iter().collect();
        dependents.sort();
        Frame {
            cell: cell.to_string(),
            dependents,
            next: 0,
        }
    }
}

/// One cell on the depth-first walk and how far through its dependents it is.
struct Frame {
    cell: String,
    dependents: Vec<String>,
    next: usize,
}

impl Frame {
    fn next_dependent(&mut self) -> Option<String> {
        let dependent = self.dependents.get(self.next).cloned();
        self.next += 1;
        dependent
    }
}
