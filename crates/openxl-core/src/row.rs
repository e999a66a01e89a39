//! Row type

use crate::cell::{Cell, CellValue};

/// A row of cells, owned by a [`Sheet`](crate::Sheet)
///
/// Cells are dense by position: the cell at index `i` lives in column `i`,
/// and a gap is an empty cell rather than a missing one.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// Create a new empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty cell and return it
    pub fn add_cell(&mut self) -> &mut Cell {
        self.cells.push(Cell::empty());
        let last = self.cells.len() - 1;
        &mut self.cells[last]
    }

    /// Append a cell holding `value`
    pub fn push<V: Into<CellValue>>(&mut self, value: V) -> &mut Cell {
        let cell = self.add_cell();
        cell.set(value);
        cell
    }

    /// Get a cell by column index
    pub fn cell(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    /// Get a mutable cell by column index
    pub fn cell_mut(&mut self, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(col)
    }

    /// Get the cell at `col`, padding the row with empty cells up to it
    pub fn cell_mut_padded(&mut self, col: usize) -> &mut Cell {
        if col >= self.cells.len() {
            self.cells.resize_with(col + 1, Cell::empty);
        }
        &mut self.cells[col]
    }

    /// All cells in column order, gaps included
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over non-empty cells with their column index
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &Cell)> {
        self.cells.iter().enumerate().filter(|(_, c)| !c.is_empty())
    }

    /// Number of cell positions in the row (gaps included)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cell positions at all
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check if every cell in the row is empty
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_pad() {
        let mut row = Row::new();
        row.add_cell().set_string("a");
        assert_eq!(row.len(), 1);

        row.cell_mut_padded(3).set_number(4.0);
        assert_eq!(row.len(), 4);
        assert!(row.cell(1).unwrap().is_empty());
        assert!(row.cell(2).unwrap().is_empty());

        let cols: Vec<usize> = row.occupied().map(|(c, _)| c).collect();
        assert_eq!(cols, vec![0, 3]);
    }

    #[test]
    fn test_blank_row() {
        let mut row = Row::new();
        assert!(row.is_blank());
        row.add_cell();
        assert!(row.is_blank());
        assert!(!row.is_empty());
        row.push(false);
        assert!(!row.is_blank());
    }
}
