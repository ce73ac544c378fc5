//! Grid presentation state: sort toggling and the row-deletion policy.

use std::fmt;

use serde::Deserialize;

/// Sort direction for a displayed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Last sorted column and its direction.
///
/// Selecting the same column twice in a row flips the direction; selecting
/// a different column starts over at ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    column: Option<String>,
    direction: Option<SortDirection>,
}

impl SortState {
    /// Register a click on `column` and return the resulting direction.
    pub fn click(&mut self, column: &str) -> SortDirection {
        let direction = match (&self.column, self.direction) {
            (Some(current), Some(direction)) if current == column => direction.reversed(),
            _ => SortDirection::Ascending,
        };
        self.column = Some(column.to_string());
        self.direction = Some(direction);
        direction
    }

    /// The active ordering, if any.
    #[must_use]
    pub fn current(&self) -> Option<(&str, SortDirection)> {
        match (&self.column, self.direction) {
            (Some(column), Some(direction)) => Some((column.as_str(), direction)),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.column = None;
        self.direction = None;
    }
}

/// How a displayed row is located when it is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteMatch {
    /// Match every displayed column. Identical rows are deleted together.
    #[default]
    FullRow,
    /// Match the declared primary key columns only.
    PrimaryKey,
}
