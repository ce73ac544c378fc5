//! SQLite credential store implementation.
//!
//! Provides the account lookup used at login, backed by Diesel.

use std::path::Path;

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::adapter::outbound::sqlite::database::connection::{establish, run_migrations};
use crate::adapter::outbound::sqlite::database::model::{NewUserRow, UserRow};
use crate::adapter::outbound::sqlite::database::schema::users;
use crate::error::{Error, Result};
use crate::port::outbound::credential::{CredentialStore, Grant, NewAccount};

/// SQLite-backed credential store.
///
/// Implements the [`CredentialStore`] trait over a single connection to the
/// credential file.
pub struct SqliteCredentialStore {
    conn: SqliteConnection,
}

impl SqliteCredentialStore {
    /// Open the credential store at `path`, creating the file if needed.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            conn: establish(path)?,
        })
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn ensure_schema(&mut self) -> Result<()> {
        run_migrations(&mut self.conn)
    }

    fn user_exists(&mut self, username: &str) -> Result<bool> {
        let count: i64 = users::table
            .filter(users::username.eq(username))
            .count()
            .get_result(&mut self.conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    fn insert_account(&mut self, account: &NewAccount<'_>) -> Result<()> {
        let row = NewUserRow {
            username: account.username,
            password: account.password,
            role: account.role,
            permission: account.permission,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut self.conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn find_grant(&mut self, username: &str, password: &str) -> Result<Option<Grant>> {
        let row = users::table
            .filter(users::username.eq(username))
            .filter(users::password.eq(password))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut self.conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.map(|row| Grant {
            role: row.role.unwrap_or_default(),
            permission: row.permission.unwrap_or_default(),
        }))
    }
}
