//! Prelude module - common imports for openxl users
//!
//! ```rust
//! use openxl::prelude::*;
//! ```

pub use crate::{
    // Main types
    Cell,
    CellAddress,
    CellKind,
    CellRange,
    CellValue,
    // Error types
    Error,
    File,
    Result,
    Row,
    Sheet,
};

#[cfg(feature = "xlsx")]
pub use crate::{
    // Extension traits
    FileExt,
    // I/O types
    XlsxError,
    XlsxReader,
    XlsxWriter,
};
