//! Persistence port for user accounts.

use crate::error::Result;

/// Role and permission strings of a matched account, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub role: String,
    pub permission: String,
}

/// A new account to insert.
#[derive(Debug, Clone, Copy)]
pub struct NewAccount<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub role: &'a str,
    pub permission: &'a str,
}

/// Storage operations for the credential table.
pub trait CredentialStore {
    /// Create the credential table if it does not exist. Idempotent.
    fn ensure_schema(&mut self) -> Result<()>;

    /// Whether an account with this exact username exists.
    fn user_exists(&mut self, username: &str) -> Result<bool>;

    /// Insert a new account.
    fn insert_account(&mut self, account: &NewAccount<'_>) -> Result<()>;

    /// Look up the grant for an exact username and password pair.
    fn find_grant(&mut self, username: &str, password: &str) -> Result<Option<Grant>>;
}
