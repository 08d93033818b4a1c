use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use tabula_engine::engine::{DependencyGraph, is_cell_name};

use super::cell::{Cell, CellContent, CellValue};
use crate::error::{Result, TabulaError};

/// Version tag used when none is given.
pub const DEFAULT_VERSION: &str = "default";

/// Canonicalizes cell names before they are checked, stored or compared.
pub type Normalizer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Extra acceptance test applied to normalized cell names.
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// UI-agnostic spreadsheet document.
///
/// Cells absent from `cells` are empty. `graph` holds one pair
/// `(referenced, referencing)` per variable of every formula cell and never
/// contains a cycle once a call returns.
pub struct Spreadsheet {
    pub(crate) cells: HashMap<String, Cell>,
    pub(crate) graph: DependencyGraph,
    pub(crate) normalizer: Normalizer,
    pub(crate) validator: Validator,
    pub(crate) version: String,
    /// Whether the sheet has been modified since it was created, loaded or saved
    pub(crate) changed: bool,
}

impl Spreadsheet {
    /// Empty spreadsheet: every cell name is accepted as written, version `"default"`.
    pub fn new() -> Self {
        Spreadsheet::with_options(
            Arc::new(|_: &str| true),
            Arc::new(|s: &str| s.to_string()),
            DEFAULT_VERSION,
        )
    }

    pub fn with_options(validator: Validator, normalizer: Normalizer, version: &str) -> Self {
        Spreadsheet {
            cells: HashMap::new(),
            graph: DependencyGraph::new(),
            normalizer,
            validator,
            version: version.to_string(),
            changed: false,
        }
    }

    /// A fresh, empty sheet sharing this sheet's name rules and version.
    pub(crate) fn empty_like(&self) -> Self {
        Spreadsheet::with_options(
            self.validator.clone(),
            self.normalizer.clone(),
            &self.version,
        )
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Read-only view of the dependency graph.
    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Normalize `name` and check it against the cell-name syntax and the validator.
    pub fn normalize_name(&self, name: &str) -> Result<String> {
        let normalized = (self.normalizer)(name);
        if is_cell_name(&normalized) && (self.validator)(&normalized) {
            Ok(normalized)
        } else {
            Err(TabulaError::InvalidName(name.to_string()))
        }
    }

    pub fn get_names_of_all_nonempty_cells(&self) -> BTreeSet<String> {
        self.cells.keys().cloned().collect()
    }

    /// Raw content of a cell; empty text for cells that were never set.
    pub fn get_cell_contents(&self, name: &str) -> Result<CellContent> {
        let name = self.normalize_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map_or_else(CellContent::empty, |cell| cell.content.clone()))
    }

    /// Cached value of a cell; empty text for cells that were never set.
    pub fn get_cell_value(&self, name: &str) -> Result<CellValue> {
        let name = self.normalize_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map_or_else(CellValue::empty, |cell| cell.value.clone()))
    }

    /// Cells whose formulas reference `name` directly.
    pub fn direct_dependents(&self, name: &str) -> Result<BTreeSet<String>> {
        let name = self.normalize_name(name)?;
        Ok(self.graph.dependents(&name).into_iter().collect())
    }
}

impl Default for Spreadsheet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Spreadsheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spreadsheet")
            .field("cells", &self.cells)
            .field("graph", &self.graph)
            .field("version", &self.version)
            .field("changed", &self.changed)
            .finish_non_exhaustive()
    }
}
