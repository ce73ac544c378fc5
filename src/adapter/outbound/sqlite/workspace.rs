//! Working database handle.
//!
//! The working database has a user-defined schema, so rows are read
//! dynamically through `rusqlite` rather than through typed Diesel models.
//! Identifiers reaching this module must already be validated by the
//! caller; values are always bound.

use std::path::{Path, PathBuf};

use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, OpenFlags};
use tracing::{debug, warn};

use crate::domain::cell::{CellValue, DisplayRow};
use crate::domain::grid::SortDirection;
use crate::domain::schema::{quote_identifier, ColumnInfo, TableDescriptor};
use crate::error::{Error, Result};

impl ToSql for CellValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            CellValue::Null => ToSqlOutput::Owned(Value::Null),
            CellValue::Integer(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            CellValue::Real(v) => ToSqlOutput::Owned(Value::Real(*v)),
            CellValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            CellValue::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

fn cell_from_ref(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(v) => CellValue::Integer(v),
        ValueRef::Real(v) => CellValue::Real(v),
        ValueRef::Text(text) => CellValue::Text(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(bytes) => CellValue::Blob(bytes.to_vec()),
    }
}

/// Column names and rows produced by a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<DisplayRow>,
}

/// What a console script produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptOutcome {
    /// The script ran; nothing to display.
    Executed,
    /// The script was a single row-returning statement.
    Rows(QueryResult),
}

/// Exclusive owner of the connection to one working database file.
///
/// Dropping the handle closes the connection; [`DatabaseHandle::close`]
/// does the same but reports close failures.
pub struct DatabaseHandle {
    conn: Connection,
    path: PathBuf,
    read_only: bool,
}

impl std::fmt::Debug for DatabaseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseHandle")
            .field("path", &self.path)
            .field("read_only", &self.read_only)
            .finish()
    }
}

impl DatabaseHandle {
    /// Open an existing database file.
    ///
    /// Read-only handles set `query_only`, so the engine rejects every
    /// statement that would modify the file.
    ///
    /// # Errors
    /// Returns an error if the file does not exist or is not a database.
    pub fn open(path: &Path, read_only: bool) -> Result<Self> {
        let flags = OpenFlags::default().difference(OpenFlags::SQLITE_OPEN_CREATE);
        let conn = Connection::open_with_flags(path, flags)?;
        Self::configure(conn, path, read_only)
    }

    /// Open a database file, creating an empty one if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or is not a database.
    pub fn open_or_create(path: &Path, read_only: bool) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::configure(conn, path, read_only)
    }

    /// Create a new, empty database file.
    ///
    /// # Errors
    /// Returns [`Error::AlreadyExists`] if something already lives at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(Error::AlreadyExists(path.to_path_buf()));
        }
        let conn = Connection::open(path)?;
        Self::configure(conn, path, false)
    }

    fn configure(conn: Connection, path: &Path, read_only: bool) -> Result<Self> {
        // Forces the header to be read so non-database files fail here.
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })?;
        if read_only {
            conn.pragma_update(None, "query_only", true)?;
        }
        debug!(path = %path.display(), read_only, "database handle opened");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
            read_only,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Table names in catalog order.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Introspect the columns of `table` in declared order.
    ///
    /// # Errors
    /// Returns [`Error::SchemaIntrospection`] if the lookup fails or the
    /// table has no columns.
    pub fn describe(&self, table: &str) -> Result<TableDescriptor> {
        let introspection = |message: String| Error::SchemaIntrospection {
            table: table.to_string(),
            message,
        };

        let mut stmt = self
            .conn
            .prepare("SELECT name, type, pk FROM pragma_table_info(?1) ORDER BY cid")
            .map_err(|e| introspection(e.to_string()))?;
        let columns = stmt
            .query_map([table], |row| {
                Ok(ColumnInfo::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    row.get::<_, i64>(2)? > 0,
                ))
            })
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| introspection(e.to_string()))?;

        if columns.is_empty() {
            return Err(introspection("no columns reported".to_string()));
        }
        Ok(TableDescriptor::new(table, columns))
    }

    /// Read the rows of a table, optionally ordered and limited.
    pub fn select_rows(
        &self,
        table: &TableDescriptor,
        order: Option<(&str, SortDirection)>,
        limit: Option<u32>,
    ) -> Result<Vec<DisplayRow>> {
        let mut sql = format!("SELECT * FROM {}", quote_identifier(&table.name));
        if let Some((column, direction)) = order {
            sql.push_str(&format!(
                " ORDER BY {} {}",
                quote_identifier(column),
                direction.as_sql()
            ));
        }
        let mut params = Vec::new();
        if let Some(limit) = limit {
            sql.push_str(" LIMIT ?1");
            params.push(CellValue::Integer(i64::from(limit)));
        }
        Ok(self.query(&sql, &params)?.rows)
    }

    /// Run a row-returning statement with bound parameters.
    pub fn query(&self, sql: &str, params: &[CellValue]) -> Result<QueryResult> {
        debug!(%sql, params = params.len(), "query");
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| -> rusqlite::Result<DisplayRow> {
                (0..width).map(|i| row.get_ref(i).map(cell_from_ref)).collect()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(QueryResult { columns, rows })
    }

    /// Run one statement with bound parameters; returns the changed row count.
    pub fn execute(&self, sql: &str, params: &[CellValue]) -> Result<usize> {
        debug!(%sql, params = params.len(), "execute");
        Ok(self.conn.execute(sql, params_from_iter(params.iter()))?)
    }

    /// Run a multi-statement script, then commit whatever it left open.
    ///
    /// A script consisting of one row-returning statement is run as a
    /// query so its rows can be displayed. If the script fails, a
    /// transaction it opened is rolled back so the handle is back in
    /// autocommit mode.
    pub fn run_script(&self, sql: &str) -> Result<ScriptOutcome> {
        match self.run_script_uncommitted(sql) {
            Ok(outcome) => {
                self.commit_pending()?;
                Ok(outcome)
            }
            Err(e) => {
                self.rollback_pending();
                Err(e)
            }
        }
    }

    fn run_script_uncommitted(&self, sql: &str) -> Result<ScriptOutcome> {
        let single = sql.trim().trim_end_matches(';').trim_end();
        if single.is_empty() {
            return Ok(ScriptOutcome::Executed);
        }

        if !single.contains(';') {
            let returns_rows = self.conn.prepare(single)?.column_count() > 0;
            if returns_rows {
                return Ok(ScriptOutcome::Rows(self.query(single, &[])?));
            }
        }

        debug!(%sql, "script");
        self.conn.execute_batch(sql)?;
        Ok(ScriptOutcome::Executed)
    }

    /// Roll back a transaction a failed script left open.
    fn rollback_pending(&self) {
        if self.conn.is_autocommit() {
            return;
        }
        match self.conn.execute_batch("ROLLBACK") {
            Ok(()) => debug!(path = %self.path.display(), "open transaction rolled back"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "rollback failed"),
        }
    }

    /// Commit a transaction left open by a script. Returns whether one was open.
    pub fn commit_pending(&self) -> Result<bool> {
        if self.conn.is_autocommit() {
            return Ok(false);
        }
        self.conn.execute_batch("COMMIT")?;
        Ok(true)
    }

    /// Run `f` inside a transaction, rolling back if it fails.
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    /// Close the connection, reporting any failure.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| Error::from(e))?;
        debug!(path = %path.display(), "database handle closed");
        Ok(())
    }
}
