use log::debug;
use std::path::Path;

use tabula_engine::engine::cell_order_key;

use super::Spreadsheet;
use super::state::{Normalizer, Validator};
use crate::error::{Result, TabulaError};
use crate::storage::{SheetDocument, parse_sheet, parse_sheet_content, write_sheet, write_sheet_content};

impl Spreadsheet {
    /// Open a saved sheet, checking that it was written with `version`.
    pub fn from_file(
        path: &Path,
        validator: Validator,
        normalizer: Normalizer,
        version: &str,
    ) -> Result<Self> {
        let mut sheet = Spreadsheet::with_options(validator, normalizer, version);
        sheet.load_file(path)?;
        Ok(sheet)
    }

    /// Replace this sheet's cells with the contents of `path`.
    /// On failure the sheet is unchanged.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let document = parse_sheet(path)?;
        self.load_document(document)?;
        debug!("loaded {}", path.display());
        Ok(())
    }

    /// Same as [`Spreadsheet::load_file`], reading XML from a string.
    pub fn load_from_str(&mut self, content: &str) -> Result<()> {
        self.load_document(parse_sheet_content(content)?)
    }

    fn load_document(&mut self, document: SheetDocument) -> Result<()> {
        if document.version != self.version {
            return Err(TabulaError::read_write(format!(
                "version mismatch: file has {:?}, expected {:?}",
                document.version, self.version
            )));
        }

        // Build into a fresh sheet so a bad entry leaves `self` untouched.
        let mut fresh = self.empty_like();
        for entry in &document.cells {
            fresh
                .set_contents_of_cell(&entry.name, &entry.contents)
                .map_err(|e| {
                    let message = format!("cell {}: {}", entry.name, e);
                    TabulaError::read_write_caused_by(message, e)
                })?;
        }

        fresh.changed = false;
        *self = fresh;
        debug!(
            "loaded {} cell(s), version {:?}",
            self.cells.len(),
            self.version
        );
        Ok(())
    }

    /// Write every nonempty cell to `path` and clear the changed flag.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        write_sheet(path, &self.version, self.sorted_entries())?;
        self.changed = false;
        debug!("saved {} cell(s) to {}", self.cells.len(), path.display());
        Ok(())
    }

    /// The XML `save` would write.
    pub fn save_to_string(&self) -> String {
        write_sheet_content(&self.version, self.sorted_entries())
    }

    /// Version recorded in a saved sheet, without loading its cells.
    pub fn saved_version(path: &Path) -> Result<String> {
        Ok(parse_sheet(path)?.version)
    }

    fn sorted_entries(&self) -> Vec<(&str, String)> {
        let mut names: Vec<&String> = self.cells.keys().collect();
        names.sort_by_cached_key(|name| cell_order_key(name));
        names
            .into_iter()
            .filter_map(|name| {
                let cell = self.cells.get(name)?;
                Some((name.as_str(), cell.content.to_input_string()))
            })
            .collect()
    }
}
