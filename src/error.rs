use std::path::PathBuf;

use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::permission::Permission;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("permission denied: cannot {action} with {permission} access")]
    PermissionDenied {
        action: &'static str,
        permission: Permission,
    },

    /// Raw message reported by the engine.
    #[error("{message}")]
    SqlExecution { message: String },

    #[error("failed to read schema of {table}: {message}")]
    SchemaIntrospection { table: String, message: String },

    #[error("no such table: {0}")]
    UnknownTable(String),

    #[error("no such column: {column} (table {table})")]
    UnknownColumn { table: String, column: String },

    #[error("no table selected")]
    NoTableSelected,

    #[error("no database is open")]
    NoDatabase,

    #[error("row {row} is out of range (table shows {len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    #[error("expected {expected} values, got {actual}")]
    ValueCount { expected: usize, actual: usize },

    #[error("table {0} has no declared primary key")]
    NoPrimaryKey(String),

    #[error("no row has been copied")]
    NothingCopied,

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("{0} is not supported")]
    Unsupported(&'static str),

    /// A shell command was malformed; the message says how to use it.
    #[error("{0}")]
    Usage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("prompt error: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::SqlExecution {
            message: err.to_string(),
        }
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Prompt(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for Error {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        Error::Prompt(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_names_action_and_tier() {
        let err = Error::PermissionDenied {
            action: "open a database",
            permission: Permission::Closed,
        };
        assert_eq!(
            err.to_string(),
            "permission denied: cannot open a database with Closed access"
        );
    }

    #[test]
    fn engine_errors_keep_raw_message() {
        let err: Error = rusqlite::Error::InvalidQuery.into();
        match err {
            Error::SqlExecution { message } => assert!(!message.is_empty()),
            other => panic!("expected SqlExecution, got {other:?}"),
        }
    }

    #[test]
    fn domain_errors_are_transparent() {
        let err: Error = DomainError::InvalidIdentifier("1x".into()).into();
        assert_eq!(err.to_string(), "invalid identifier '1x'");
    }

    #[test]
    fn already_exists_shows_path() {
        let err = Error::AlreadyExists(PathBuf::from("/tmp/shop.db"));
        assert_eq!(err.to_string(), "/tmp/shop.db already exists");
    }
}
