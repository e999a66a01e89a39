//! # openxl
//!
//! A Rust library for reading and writing XLSX spreadsheet documents.
//!
//! A document is a [`File`] holding named [`Sheet`]s of [`Row`]s of
//! [`Cell`]s, each cell carrying a string, number or boolean. The `xlsx`
//! feature (on by default) adds the Office Open XML marshaller and
//! unmarshaller.
//!
//! ## Example
//!
//! ```rust
//! use openxl::prelude::*;
//! use std::io::Cursor;
//!
//! let mut file = File::new();
//! let sheet = file.add_sheet("MySheet").unwrap();
//! sheet.set_cell_value("A1", "Hello").unwrap();
//! sheet.set_cell_value("B1", 42.0).unwrap();
//! sheet.set_cell_value("C1", true).unwrap();
//!
//! let mut buf = Vec::new();
//! XlsxWriter::write(&mut file, Cursor::new(&mut buf)).unwrap();
//!
//! let file = XlsxReader::read(Cursor::new(&buf)).unwrap();
//! assert_eq!(file.sheet(0).unwrap().get_value("B1").unwrap(), CellValue::Number(42.0));
//!
//! // Or go through the filesystem:
//! // file.save("output.xlsx").unwrap();
//! ```

pub mod prelude;

// Re-export core types
pub use openxl_core::{
    Cell, CellAddress, CellKind, CellRange, CellValue, Error, File, Result, Row,
    SharedStringTable, Sheet, MAX_COLS, MAX_ROWS, MAX_SHEET_NAME_LEN,
};

// Re-export I/O types
#[cfg(feature = "xlsx")]
pub use openxl_xlsx::{PartMap, PartSet, XlsxError, XlsxReader, XlsxResult, XlsxWriter};

#[cfg(feature = "xlsx")]
use std::path::Path;

/// Extension trait for File to add file I/O
#[cfg(feature = "xlsx")]
pub trait FileExt: Sized {
    /// Open a document from a file
    fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self>;

    /// Save the document to a file
    ///
    /// Takes `&mut self` because saving rebuilds the shared-string table.
    fn save<P: AsRef<Path>>(&mut self, path: P) -> XlsxResult<()>;
}

#[cfg(feature = "xlsx")]
impl FileExt for File {
    fn open<P: AsRef<Path>>(path: P) -> XlsxResult<File> {
        let path = path.as_ref();
        match extension(path).as_deref() {
            Some("xlsx") | Some("xlsm") => XlsxReader::read_file(path),
            _ => Err(XlsxError::InvalidFormat(format!(
                "Unsupported file format: {}",
                path.display()
            ))),
        }
    }

    fn save<P: AsRef<Path>>(&mut self, path: P) -> XlsxResult<()> {
        let path = path.as_ref();
        match extension(path).as_deref() {
            Some("xlsx") => XlsxWriter::write_file(self, path),
            _ => Err(XlsxError::InvalidFormat(format!(
                "Unsupported file format: {}",
                path.display()
            ))),
        }
    }
}

#[cfg(feature = "xlsx")]
fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}
