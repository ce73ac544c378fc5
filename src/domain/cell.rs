//! Cell values as stored by the engine.

use std::fmt;

use serde::Serialize;

/// One value of a displayed row, tagged with its storage class.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// Ordered cell values matching the displayed table's column order.
pub type DisplayRow = Vec<CellValue>;

impl CellValue {
    /// Interpret user input for a cell.
    ///
    /// A bare `NULL` (any case) becomes [`CellValue::Null`]; anything else is
    /// passed as text and left to the column's type affinity.
    #[must_use]
    pub fn from_input(input: &str) -> Self {
        if input.eq_ignore_ascii_case("null") {
            Self::Null
        } else {
            Self::Text(input.to_string())
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Blob(bytes) => {
                f.write_str("x'")?;
                for b in bytes {
                    write!(f, "{b:02X}")?;
                }
                f.write_str("'")
            }
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}
