//! Editor state and the operations behind every command.
//!
//! [`EditorState`] is the single owner of everything the browser shows:
//! the session, the open [`DatabaseHandle`], the selected table and its
//! rows, the sort state and the copied row. Handlers receive it by `&mut`
//! instead of reaching for ambient state.
//!
//! The engine file stays authoritative. Grid state is rebuilt from it after
//! every mutation.

mod console;
mod file;
mod grid;

use std::path::Path;

use crate::adapter::outbound::sqlite::workspace::DatabaseHandle;
use crate::domain::cell::DisplayRow;
use crate::domain::grid::{DeleteMatch, SortState};
use crate::domain::schema::TableDescriptor;
use crate::domain::session::Session;
use crate::error::{Error, Result};

pub use crate::adapter::outbound::sqlite::workspace::{QueryResult, ScriptOutcome};

/// Behaviour knobs taken from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorSettings {
    /// Upper bound on rows loaded for display.
    pub row_limit: Option<u32>,
    /// How deleted rows are matched.
    pub delete_match: DeleteMatch,
}

/// The table currently shown in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub descriptor: TableDescriptor,
    pub rows: Vec<DisplayRow>,
}

/// Which permission check an operation needs.
#[derive(Debug, Clone, Copy)]
enum Access {
    Open,
    Read,
    Write,
}

/// Explicit editor state threaded through every handler.
#[derive(Debug)]
pub struct EditorState {
    session: Session,
    settings: EditorSettings,
    handle: Option<DatabaseHandle>,
    tables: Vec<String>,
    view: Option<TableView>,
    sort: SortState,
    copied_row: Option<DisplayRow>,
}

impl EditorState {
    /// Create an editor with no database open.
    pub fn new(session: Session, settings: EditorSettings) -> Self {
        Self {
            session,
            settings,
            handle: None,
            tables: Vec::new(),
            view: None,
            sort: SortState::default(),
            copied_row: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn settings(&self) -> EditorSettings {
        self.settings
    }

    /// Path of the open database, if any.
    #[must_use]
    pub fn database_path(&self) -> Option<&Path> {
        self.handle.as_ref().map(DatabaseHandle::path)
    }

    /// Table names as of the last refresh.
    #[must_use]
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// The table shown in the grid.
    #[must_use]
    pub fn view(&self) -> Option<&TableView> {
        self.view.as_ref()
    }

    #[must_use]
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    #[must_use]
    pub fn copied_row(&self) -> Option<&DisplayRow> {
        self.copied_row.as_ref()
    }

    fn require(&self, access: Access, action: &'static str) -> Result<()> {
        let permission = self.session.permission();
        let allowed = match access {
            Access::Open => !permission.is_blocked(),
            Access::Read => permission.has_read_access(),
            Access::Write => permission.has_write_access(),
        };
        if allowed {
            Ok(())
        } else {
            Err(Error::PermissionDenied { action, permission })
        }
    }

    fn handle(&self) -> Result<&DatabaseHandle> {
        self.handle.as_ref().ok_or(Error::NoDatabase)
    }

    fn current(&self) -> Result<&TableView> {
        self.view.as_ref().ok_or(Error::NoTableSelected)
    }

    fn release_handle(&mut self) -> Result<()> {
        self.view = None;
        self.tables.clear();
        self.sort.reset();
        if let Some(previous) = self.handle.take() {
            previous.close()?;
        }
        Ok(())
    }

    /// Re-read the table list from the engine catalog.
    pub fn refresh_tables(&mut self) -> Result<&[String]> {
        self.require(Access::Read, "list tables")?;
        self.tables = self.handle()?.list_tables()?;
        Ok(&self.tables)
    }

    /// Return the table list, re-read from the engine.
    pub fn list_tables(&mut self) -> Result<&[String]> {
        self.refresh_tables()
    }

    /// Check a table name against the live catalog.
    ///
    /// The engine compares identifiers without regard to ASCII case; the
    /// catalog spelling is returned.
    fn known_table(&mut self, name: &str) -> Result<String> {
        self.refresh_tables()?;
        self.tables
            .iter()
            .find(|t| t.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    /// Close the open database, if any.
    pub fn close(&mut self) -> Result<()> {
        self.release_handle()
    }
}
