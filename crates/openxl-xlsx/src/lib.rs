//! # openxl-xlsx
//!
//! XLSX (Office Open XML) part marshaller and unmarshaller for openxl.
//!
//! The core of this crate translates between an [`openxl_core::File`] and
//! the set of XML parts that make up a spreadsheet package:
//! - [`XlsxWriter::marshal_parts`] - File -> `{part path: XML text}`
//! - [`XlsxReader::unmarshal_parts`] - `{part path: XML bytes}` -> File
//!
//! [`container`] moves those part sets in and out of the ZIP archive.

pub mod container;
pub mod error;
pub mod parts;
pub mod reader;
pub mod relationships;
pub mod writer;

mod xml;

pub use error::{XlsxError, XlsxResult};
pub use parts::{PartMap, PartSet};
pub use reader::XlsxReader;
pub use relationships::{Relationship, Relationships};
pub use writer::XlsxWriter;
