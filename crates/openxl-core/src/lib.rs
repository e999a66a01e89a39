//! # openxl-core
//!
//! Core data structures for the openxl spreadsheet library.
//!
//! This crate provides the in-memory model that the XLSX marshaller and
//! unmarshaller translate to and from:
//! - [`File`] - An ordered, name-addressable collection of [`Sheet`]s
//! - [`Sheet`], [`Row`], [`Cell`] - The owned document tree
//! - [`CellValue`] - A closed string/number/boolean value (or empty)
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing
//! - [`SharedStringTable`] - First-seen-order string interning
//!
//! ## Example
//!
//! ```rust
//! use openxl_core::{CellValue, File};
//!
//! let mut file = File::new();
//! let sheet = file.add_sheet("MySheet").unwrap();
//! let row = sheet.add_row();
//! row.add_cell().set_string("A cell!");
//! row.add_cell().set_number(42.0);
//!
//! let sheet = file.sheet_by_name("mysheet").unwrap();
//! assert_eq!(sheet.cell(0, 1).map(|c| c.value()), Some(&CellValue::Number(42.0)));
//! assert_eq!(sheet.dimension().to_string(), "A1:B1");
//! ```

pub mod cell;
pub mod error;
pub mod file;
pub mod row;
pub mod shared_strings;
pub mod sheet;

// Re-exports for convenience
pub use cell::{Cell, CellAddress, CellKind, CellRange, CellValue};
pub use error::{Error, Result};
pub use file::File;
pub use row::Row;
pub use shared_strings::SharedStringTable;
pub use sheet::Sheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
