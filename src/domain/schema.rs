//! Table descriptors and identifier handling.
//!
//! Identifiers are never spliced into SQL as typed by the user. Existing
//! names are checked against a [`TableDescriptor`] or the table list first;
//! new names must pass [`validate_new_identifier`]. Both are then emitted
//! through [`quote_identifier`].

use serde::Serialize;

use super::error::DomainError;

/// One column as reported by schema introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
    pub primary_key: bool,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, primary_key: bool) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            primary_key,
        }
    }

    /// Whether searches on this column should use substring matching.
    #[must_use]
    pub fn is_textual(&self) -> bool {
        let upper = self.declared_type.to_ascii_uppercase();
        upper.contains("CHAR") || upper.contains("TEXT")
    }
}

/// A table name with its columns in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column the way the engine resolves names, ignoring ASCII case.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// The column used to target single-row updates.
    ///
    /// This is the first declared column, assumed rather than verified to be
    /// the primary key.
    #[must_use]
    pub fn first_column(&self) -> Option<&ColumnInfo> {
        self.columns.first()
    }

    /// Columns the engine does not assign on insert.
    #[must_use]
    pub fn insertable_columns(&self) -> Vec<&ColumnInfo> {
        self.columns.iter().filter(|c| !c.primary_key).collect()
    }
}

/// Quote an identifier for SQLite, doubling embedded quotes.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Check a name for a table or column that does not exist yet.
///
/// Accepts a letter or underscore followed by letters, digits, underscores
/// and inner spaces.
pub fn validate_new_identifier(name: &str) -> Result<&str, DomainError> {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ')
        }
        _ => false,
    };
    if valid {
        Ok(trimmed)
    } else {
        Err(DomainError::InvalidIdentifier(name.to_string()))
    }
}

/// Check a declared column type such as `TEXT`, `VARCHAR(20)` or `DECIMAL(10, 2)`.
pub fn validate_column_type(declared: &str) -> Result<&str, DomainError> {
    let trimmed = declared.trim();
    let starts_alpha = trimmed.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    let allowed = trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ' ' | '(' | ')' | ','));
    if starts_alpha && allowed {
        Ok(trimmed)
    } else {
        Err(DomainError::InvalidColumnType(declared.to_string()))
    }
}

/// Parse a column definition such as `id INTEGER PRIMARY KEY` or `note TEXT`.
///
/// The first word is the column name; a trailing `PRIMARY KEY` marks the
/// key; whatever sits between is the declared type and may be empty.
pub fn parse_column_definition(definition: &str) -> Result<ColumnInfo, DomainError> {
    let trimmed = definition.trim();
    let (name, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));
    let name = validate_new_identifier(name)?;

    let rest = rest.trim();
    let upper = rest.to_ascii_uppercase();
    let (declared, primary_key) = match upper.strip_suffix("PRIMARY KEY") {
        Some(head) => (rest[..head.len()].trim_end(), true),
        None => (rest, false),
    };
    let declared = if declared.is_empty() {
        declared
    } else {
        validate_column_type(declared)?
    };
    Ok(ColumnInfo::new(name, declared, primary_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> TableDescriptor {
        TableDescriptor::new(
            "users",
            vec![
                ColumnInfo::new("id", "INTEGER", true),
                ColumnInfo::new("name", "TEXT", false),
                ColumnInfo::new("age", "INTEGER", false),
            ],
        )
    }

    #[test]
    fn insertable_columns_skip_primary_key() {
        let table = users();
        let names: Vec<&str> = table
            .insertable_columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "age"]);
    }

    #[test]
    fn first_column_is_update_target() {
        assert_eq!(users().first_column().map(|c| c.name.as_str()), Some("id"));
    }

    #[test]
    fn lookups_ignore_ascii_case() {
        let table = users();
        assert_eq!(table.index_of("age"), Some(2));
        assert_eq!(table.index_of("AGE"), Some(2));
        assert_eq!(table.column("Name").map(|c| c.name.as_str()), Some("name"));
        assert!(table.column("nam").is_none());
    }

    #[test]
    fn textual_columns() {
        assert!(ColumnInfo::new("a", "VARCHAR(20)", false).is_textual());
        assert!(ColumnInfo::new("a", "text", false).is_textual());
        assert!(!ColumnInfo::new("a", "INTEGER", false).is_textual());
        assert!(!ColumnInfo::new("a", "", false).is_textual());
    }

    #[test]
    fn quote_identifier_escapes_quotes() {
        assert_eq!(quote_identifier("previous orders"), "\"previous orders\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn new_identifiers() {
        assert_eq!(validate_new_identifier(" email "), Ok("email"));
        assert!(validate_new_identifier("previous orders").is_ok());
        assert!(validate_new_identifier("_tmp1").is_ok());
        assert!(validate_new_identifier("1st").is_err());
        assert!(validate_new_identifier("x; DROP TABLE users").is_err());
        assert!(validate_new_identifier("").is_err());
    }

    #[test]
    fn column_types() {
        assert_eq!(validate_column_type("TEXT"), Ok("TEXT"));
        assert!(validate_column_type("DECIMAL(10, 2)").is_ok());
        assert!(validate_column_type("TEXT; DROP TABLE x").is_err());
        assert!(validate_column_type("").is_err());
    }

    #[test]
    fn column_definitions() {
        assert_eq!(
            parse_column_definition("id INTEGER PRIMARY KEY"),
            Ok(ColumnInfo::new("id", "INTEGER", true))
        );
        assert_eq!(
            parse_column_definition("  price decimal(10, 2) "),
            Ok(ColumnInfo::new("price", "decimal(10, 2)", false))
        );
        assert_eq!(
            parse_column_definition("tag"),
            Ok(ColumnInfo::new("tag", "", false))
        );
        assert_eq!(
            parse_column_definition("key primary key"),
            Ok(ColumnInfo::new("key", "", true))
        );
        assert!(parse_column_definition("x TEXT, y TEXT); DROP TABLE t; --").is_err());
        assert!(parse_column_definition("").is_err());
    }
}
