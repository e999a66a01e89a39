//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur during XLSX marshalling/unmarshalling
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML could not be tokenized
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Well-formed XML with the wrong structure
    #[error("Parse error in {part}: {message}")]
    Parse { part: String, message: String },

    /// Not an XLSX package
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// A cell references a shared string that does not exist
    #[error("Shared string index {index} out of range (table has {len} entries)")]
    SharedStringIndex { index: usize, len: usize },

    /// The workbook manifest names a relationship id with no relationship
    #[error("Relationship id not found: {0}")]
    UnresolvedRelationship(String),

    /// The document cannot be serialized
    #[error("Cannot marshal document: {0}")]
    Marshal(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] openxl_core::Error),
}

impl XlsxError {
    /// Create a structural parse error for `part`
    pub fn parse<P: Into<String>, M: Into<String>>(part: P, message: M) -> Self {
        XlsxError::Parse {
            part: part.into(),
            message: message.into(),
        }
    }

    /// Whether this error means the input XML was unusable
    pub fn is_parse_error(&self) -> bool {
        matches!(self, XlsxError::Xml(_) | XlsxError::Parse { .. })
    }
}
