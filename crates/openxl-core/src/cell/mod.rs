//! Cell-related types and utilities
//!
//! This module contains:
//! - [`Cell`] - A single cell owned by a row
//! - [`CellValue`] / [`CellKind`] - The closed set of values a cell can hold
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A rectangular range of cells (e.g., "A1:B10")

mod address;
mod value;

pub use address::{CellAddress, CellRange};
pub use value::{Cell, CellKind, CellValue};
