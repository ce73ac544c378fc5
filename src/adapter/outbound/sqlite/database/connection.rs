//! Credential database connection management using Diesel ORM.
//!
//! Provides connection establishment and migration support for the
//! credential store file.

use std::path::Path;

use diesel::prelude::*;
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{Error, Result};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Open a connection to the credential database at `path`.
///
/// The file is created if it does not exist.
///
/// # Errors
/// Returns an error if the connection cannot be established.
pub fn establish(path: &Path) -> Result<SqliteConnection> {
    let url = path.to_string_lossy();
    SqliteConnection::establish(&url).map_err(|e| Error::Connection(e.to_string()))
}

/// Run all pending database migrations.
///
/// The users migration uses `CREATE TABLE IF NOT EXISTS`, so credential
/// files created by earlier tools are adopted as they are.
///
/// # Errors
/// Returns an error if migrations fail.
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<()> {
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Connection(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(diesel::QueryableByName)]
    struct TableName {
        #[diesel(sql_type = diesel::sql_types::Text)]
        name: String,
    }

    fn table_names(conn: &mut SqliteConnection) -> Vec<String> {
        diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
        )
        .load::<TableName>(conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect()
    }

    #[test]
    fn establish_in_memory() {
        assert!(establish(Path::new(":memory:")).is_ok());
    }

    #[test]
    fn run_migrations_creates_users_table() {
        let mut conn = establish(Path::new(":memory:")).unwrap();
        run_migrations(&mut conn).unwrap();
        assert_eq!(table_names(&mut conn), vec!["users".to_string()]);
    }

    #[test]
    fn run_migrations_is_idempotent() {
        let mut conn = establish(Path::new(":memory:")).unwrap();
        run_migrations(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();
        assert_eq!(table_names(&mut conn).len(), 1);
    }

    #[test]
    fn run_migrations_adopts_existing_users_table() {
        let mut conn = establish(Path::new(":memory:")).unwrap();
        diesel::sql_query(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, username TEXT UNIQUE, password TEXT, role TEXT, permission TEXT)",
        )
        .execute(&mut conn)
        .unwrap();
        diesel::sql_query(
            "INSERT INTO users (username, password, role, permission) VALUES ('kim', 'pw', 'clerk', 'Write')",
        )
        .execute(&mut conn)
        .unwrap();

        run_migrations(&mut conn).unwrap();

        #[derive(diesel::QueryableByName)]
        struct Count {
            #[diesel(sql_type = diesel::sql_types::BigInt)]
            count: i64,
        }
        let rows: Vec<Count> = diesel::sql_query("SELECT COUNT(*) AS count FROM users")
            .load(&mut conn)
            .unwrap();
        assert_eq!(rows[0].count, 1);
    }
}
