//! Sheet type

use crate::cell::{Cell, CellAddress, CellRange, CellValue};
use crate::error::Result;
use crate::row::Row;
use crate::{MAX_COLS, MAX_ROWS};

/// A worksheet: a name plus an ordered sequence of rows
///
/// Sheets are owned by a [`File`](crate::File), which keeps names unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Sheet name
    name: String,
    /// Rows, dense by position (index 0 is row 1)
    rows: Vec<Row>,
}

impl Sheet {
    /// Create a new empty sheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renaming goes through [`File::rename_sheet`](crate::File::rename_sheet)
    /// so the name index stays in sync.
    pub(crate) fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Rows ===

    /// Append an empty row and return it
    pub fn add_row(&mut self) -> &mut Row {
        self.rows.push(Row::new());
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    /// Get a row by 0-based index
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Get a mutable row by 0-based index
    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    /// Get the row at `index`, padding the sheet with empty rows up to it
    pub fn row_mut_padded(&mut self, index: usize) -> &mut Row {
        if index >= self.rows.len() {
            self.rows.resize_with(index + 1, Row::new);
        }
        &mut self.rows[index]
    }

    /// All rows in order, gaps included
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of row positions (gaps included)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    // === Cell Access ===

    /// Get a cell by 0-based row and column indices
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cell(col))
    }

    /// Get a cell by address string (e.g., "B3")
    pub fn cell_at(&self, address: &str) -> Result<Option<&Cell>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cell(addr.row as usize, addr.col as usize))
    }

    /// Get a cell value by address string, `Empty` when absent
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        Ok(self
            .cell_at(address)?
            .map(|c| c.value().clone())
            .unwrap_or_default())
    }

    /// Set a cell value by address string, padding rows and cells as needed
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row as usize, addr.col as usize, value);
        Ok(())
    }

    /// Set a cell value by 0-based indices, padding rows and cells as needed
    pub fn set_cell_value_at<V: Into<CellValue>>(&mut self, row: usize, col: usize, value: V) {
        self.row_mut_padded(row).cell_mut_padded(col).set(value);
    }

    /// Iterate over non-empty cells in row-major order as `(row, col, cell)`
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.occupied().map(move |(c, cell)| (r, c, cell)))
    }

    /// The minimal range covering every non-empty cell
    ///
    /// An empty sheet degenerates to `A1:A1`. Positions past the worksheet
    /// limits are clamped; writers reject them separately.
    pub fn dimension(&self) -> CellRange {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;

        for (r, c, _) in self.occupied_cells() {
            bounds = Some(match bounds {
                None => (r, c, r, c),
                Some((r0, c0, r1, c1)) => (r0.min(r), c0.min(c), r1.max(r), c1.max(c)),
            });
        }

        match bounds {
            None => CellRange::single(CellAddress::new(0, 0)),
            Some((r0, c0, r1, c1)) => CellRange::new(clamp_address(r0, c0), clamp_address(r1, c1)),
        }
    }
}

fn clamp_address(row: usize, col: usize) -> CellAddress {
    CellAddress::new(
        row.min(MAX_ROWS as usize - 1) as u32,
        col.min(MAX_COLS as usize - 1) as u16,
    )
}
