//! Domain validation errors.
//!
//! These errors are returned when a value coming from the user or from a
//! stored record does not satisfy a domain rule, before any SQL is built.
//!
//! # Examples
//!
//! ```
//! use opendoc::domain::error::DomainError;
//! use opendoc::domain::permission::Permission;
//!
//! let result = "Admin only".parse::<Permission>();
//! assert!(matches!(result, Err(DomainError::UnknownPermission(_))));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Stored permission string is not one of the four tiers.
    #[error("unrecognized permission '{0}' (expected Read-only, Write, Full write or Closed)")]
    UnknownPermission(String),

    /// A name for a new table or column is not a plain identifier.
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    /// A declared column type contains characters outside a type name.
    #[error("invalid column type '{0}'")]
    InvalidColumnType(String),

    /// Template name is not one of the built-in templates.
    #[error("unknown template '{0}' (expected 'user' or 'business')")]
    UnknownTemplate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_permission_message_lists_tiers() {
        let err = DomainError::UnknownPermission("root".into());
        let msg = err.to_string();
        assert!(msg.contains("root"));
        assert!(msg.contains("Full write"));
    }

    #[test]
    fn invalid_identifier_message_quotes_name() {
        let err = DomainError::InvalidIdentifier("a;b".into());
        assert_eq!(err.to_string(), "invalid identifier 'a;b'");
    }
}
