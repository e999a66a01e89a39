//! Cell value types

use std::fmt;

use crate::error::{Error, Result};

/// Represents the value stored in a cell
///
/// The set of kinds is closed: every non-empty cell is exactly one of string,
/// number or boolean, which is what decides its XML encoding.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Empty cell (a gap in the row)
    #[default]
    Empty,

    /// String value, stored through the shared-string table on disk
    String(String),

    /// Numeric value (all numbers stored as f64)
    Number(f64),

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),
}

/// The kind of a non-empty cell value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    String,
    Number,
    Boolean,
}

impl CellKind {
    /// Get the kind name for error messages
    pub fn name(&self) -> &'static str {
        match self {
            CellKind::String => "string",
            CellKind::Number => "number",
            CellKind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Parse a literal as a value of the given kind
    ///
    /// Numbers use Rust's `f64` grammar but must be finite (`NaN`, `inf` and
    /// overflowing exponents are rejected); booleans accept `1`/`0` (the
    /// on-disk form) and `true`/`false` in any case.
    ///
    /// ```
    /// use openxl_core::{CellKind, CellValue};
    ///
    /// assert_eq!(CellValue::parse_literal(CellKind::Number, "2.5").unwrap(), CellValue::Number(2.5));
    /// assert_eq!(CellValue::parse_literal(CellKind::Boolean, "1").unwrap(), CellValue::Boolean(true));
    /// assert!(CellValue::parse_literal(CellKind::Number, "two").is_err());
    /// assert!(CellValue::parse_literal(CellKind::Number, "NaN").is_err());
    /// ```
    pub fn parse_literal(kind: CellKind, literal: &str) -> Result<Self> {
        let invalid = || Error::InvalidLiteral {
            kind: kind.name(),
            literal: literal.to_string(),
        };

        match kind {
            CellKind::String => Ok(CellValue::String(literal.to_string())),
            CellKind::Number => literal
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(CellValue::Number)
                .ok_or_else(invalid),
            CellKind::Boolean => match literal.trim() {
                "1" => Ok(CellValue::Boolean(true)),
                "0" => Ok(CellValue::Boolean(false)),
                s if s.eq_ignore_ascii_case("true") => Ok(CellValue::Boolean(true)),
                s if s.eq_ignore_ascii_case("false") => Ok(CellValue::Boolean(false)),
                _ => Err(invalid()),
            },
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The kind of this value, `None` for empty cells
    pub fn kind(&self) -> Option<CellKind> {
        match self {
            CellValue::Empty => None,
            CellValue::String(_) => Some(CellKind::String),
            CellValue::Number(_) => Some(CellKind::Number),
            CellValue::Boolean(_) => Some(CellKind::Boolean),
        }
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::String(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

/// A single cell, owned by a [`Row`](crate::Row)
///
/// A cell's column is its position in the row's cell sequence.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    value: CellValue,
}

impl Cell {
    /// Create a cell holding a value
    pub fn new(value: CellValue) -> Self {
        Self { value }
    }

    /// Create an empty cell
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the cell value
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    /// The kind of the cell's value, `None` if empty
    pub fn kind(&self) -> Option<CellKind> {
        self.value.kind()
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the cell value
    pub fn set<V: Into<CellValue>>(&mut self, value: V) {
        self.value = value.into();
    }

    /// Set the cell from a literal interpreted as `kind`
    pub fn set_value(&mut self, kind: CellKind, literal: &str) -> Result<()> {
        self.value = CellValue::parse_literal(kind, literal)?;
        Ok(())
    }

    pub fn set_string<S: Into<String>>(&mut self, s: S) {
        self.value = CellValue::String(s.into());
    }

    pub fn set_number(&mut self, n: f64) {
        self.value = CellValue::Number(n);
    }

    pub fn set_bool(&mut self, b: bool) {
        self.value = CellValue::Boolean(b);
    }

    /// Make the cell empty
    pub fn clear(&mut self) {
        self.value = CellValue::Empty;
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}
