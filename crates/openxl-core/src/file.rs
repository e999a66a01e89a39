//! File type - the main document structure

use ahash::AHashMap;

use crate::error::{Error, Result};
use crate::shared_strings::SharedStringTable;
use crate::sheet::Sheet;
use crate::MAX_SHEET_NAME_LEN;

/// A spreadsheet document
///
/// Sheets are kept in insertion order (which fixes part numbering and
/// relationship ids when writing) and are also reachable by name. Name
/// matching is case-insensitive for both the uniqueness check and lookup,
/// the way Excel treats sheet names.
#[derive(Debug, Default)]
pub struct File {
    /// Sheets in insertion order
    sheets: Vec<Sheet>,
    /// Folded sheet name -> position in `sheets`
    name_index: AHashMap<String, usize>,
    /// String table shared by every sheet of the document
    shared_strings: SharedStringTable,
}

impl File {
    /// Create a new document with no sheets
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the document has no sheets
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Get a sheet by position
    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// Get a mutable sheet by position
    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(index)
    }

    /// Get a sheet by name
    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheet_index(name).map(|i| &self.sheets[i])
    }

    /// Get a mutable sheet by name
    pub fn sheet_by_name_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheet_index(name).map(move |i| &mut self.sheets[i])
    }

    /// Get the position of a sheet by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.name_index.get(&fold_name(name)).copied()
    }

    /// Iterate over all sheets in order
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter()
    }

    /// Iterate over all sheets mutably, in order
    pub fn sheets_mut(&mut self) -> impl Iterator<Item = &mut Sheet> {
        self.sheets.iter_mut()
    }

    /// Sheet names in order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }

    /// Add a new empty sheet
    ///
    /// Fails with [`Error::DuplicateSheetName`] if a sheet with the same
    /// name (ignoring case) already exists; nothing is overwritten.
    pub fn add_sheet(&mut self, name: &str) -> Result<&mut Sheet> {
        let index = self.add_existing_sheet(Sheet::new(name))?;
        Ok(&mut self.sheets[index])
    }

    /// Add a sheet built elsewhere, returning its position
    pub fn add_existing_sheet(&mut self, sheet: Sheet) -> Result<usize> {
        self.validate_sheet_name(sheet.name(), None)?;

        let index = self.sheets.len();
        self.name_index.insert(fold_name(sheet.name()), index);
        self.sheets.push(sheet);
        Ok(index)
    }

    /// Remove a sheet by name
    pub fn remove_sheet(&mut self, name: &str) -> Result<Sheet> {
        let index = self
            .sheet_index(name)
            .ok_or_else(|| Error::SheetNotFound(name.into()))?;

        let sheet = self.sheets.remove(index);
        self.rebuild_index();
        Ok(sheet)
    }

    /// Rename a sheet
    pub fn rename_sheet(&mut self, name: &str, new_name: &str) -> Result<()> {
        let index = self
            .sheet_index(name)
            .ok_or_else(|| Error::SheetNotFound(name.into()))?;

        self.validate_sheet_name(new_name, Some(index))?;

        self.name_index.remove(&fold_name(name));
        self.name_index.insert(fold_name(new_name), index);
        self.sheets[index].set_name(new_name);
        Ok(())
    }

    /// The document's shared-string table
    ///
    /// Writers rebuild it on every marshal; readers fill it with the
    /// document's strings in the order a marshal would assign them.
    pub fn shared_strings(&self) -> &SharedStringTable {
        &self.shared_strings
    }

    /// Replace the shared-string table
    pub fn set_shared_strings(&mut self, table: SharedStringTable) {
        self.shared_strings = table;
    }

    fn rebuild_index(&mut self) {
        self.name_index = self
            .sheets
            .iter()
            .enumerate()
            .map(|(i, s)| (fold_name(s.name()), i))
            .collect();
    }

    /// Validate a sheet name, optionally excluding a sheet from the duplicate check
    fn validate_sheet_name(&self, name: &str, exclude_index: Option<usize>) -> Result<()> {
        // Check length
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }

        // Check for invalid characters
        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }
        if let Some(c) = name
            .chars()
            .find(|&c| c.is_control() || c == '\u{FFFE}' || c == '\u{FFFF}')
        {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain U+{:04X}",
                c as u32
            )));
        }

        match self.sheet_index(name) {
            Some(i) if Some(i) != exclude_index => Err(Error::DuplicateSheetName(name.into())),
            _ => Ok(()),
        }
    }
}

fn fold_name(name: &str) -> String {
    name.to_lowercase()
}
