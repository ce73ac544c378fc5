//! File lifecycle: open, new, save and save-as.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use super::{Access, EditorState};
use crate::adapter::outbound::sqlite::workspace::DatabaseHandle;
use crate::domain::template::Template;
use crate::error::{Error, Result};

impl EditorState {
    fn read_only(&self) -> bool {
        !self.session.permission().has_write_access()
    }

    /// Swap in the handle returned by `acquire`.
    ///
    /// The previous connection is closed before `acquire` runs. If `acquire`
    /// fails the previous file is reopened so the editor keeps its database.
    fn replace_handle(
        &mut self,
        acquire: impl FnOnce(bool) -> Result<DatabaseHandle>,
    ) -> Result<()> {
        let read_only = self.read_only();
        let previous = self.handle.as_ref().map(|h| h.path().to_path_buf());
        self.release_handle()?;

        match acquire(read_only) {
            Ok(handle) => {
                info!(
                    path = %handle.path().display(),
                    read_only = handle.is_read_only(),
                    "database opened"
                );
                self.handle = Some(handle);
            }
            Err(e) => {
                if let Some(previous) = previous {
                    match DatabaseHandle::open(&previous, read_only) {
                        Ok(handle) => self.handle = Some(handle),
                        Err(reopen) => {
                            warn!(path = %previous.display(), error = %reopen, "could not reopen previous database");
                        }
                    }
                    if self.handle.is_some() {
                        self.refresh_tables()?;
                    }
                }
                return Err(e);
            }
        }
        self.refresh_tables()?;
        Ok(())
    }

    /// Open an existing database file, replacing the current one.
    ///
    /// # Errors
    /// [`Error::PermissionDenied`] for a closed account, in which case the
    /// current handle is left untouched.
    pub fn open_file(&mut self, path: &Path) -> Result<()> {
        self.require(Access::Open, "open a database")?;
        self.replace_handle(|read_only| DatabaseHandle::open(path, read_only))
    }

    /// Open `path`, creating an empty database when nothing exists there.
    ///
    /// Used for the configured default database at startup.
    pub fn open_or_create_file(&mut self, path: &Path) -> Result<()> {
        self.require(Access::Open, "open a database")?;
        self.replace_handle(|read_only| DatabaseHandle::open_or_create(path, read_only))
    }

    /// Create a new database at `path`, optionally filled from a template.
    ///
    /// # Errors
    /// [`Error::AlreadyExists`] if `path` is taken.
    pub fn new_file(&mut self, path: &Path, template: Option<Template>) -> Result<()> {
        self.require(Access::Open, "create a database")?;
        self.require(Access::Write, "create a database")?;
        if path.exists() {
            return Err(Error::AlreadyExists(path.to_path_buf()));
        }

        self.replace_handle(|_| {
            let handle = DatabaseHandle::create(path)?;
            if let Some(template) = template {
                handle.in_transaction(|h| {
                    for statement in template.statements() {
                        h.execute(statement, &[])?;
                    }
                    Ok(())
                })?;
                info!(%template, "template applied");
            }
            Ok(handle)
        })
    }

    /// Commit anything left pending on the current database.
    pub fn save_file(&mut self) -> Result<()> {
        self.require(Access::Open, "save a database")?;
        let committed = self.handle()?.commit_pending()?;
        info!(committed, "database saved");
        Ok(())
    }

    /// Commit, copy the current file to `path` and continue working there.
    ///
    /// The selected table stays selected when it exists in the copy. If the
    /// copy cannot be written or opened, the editor stays on the current file.
    pub fn save_file_as(&mut self, path: &Path) -> Result<()> {
        self.require(Access::Open, "save a database")?;
        let handle = self.handle()?;
        handle.commit_pending()?;
        let source = handle.path().to_path_buf();
        if is_same_file(&source, path) {
            return Ok(());
        }

        let table = self.view.as_ref().map(|v| v.descriptor.name.clone());
        let switched = self.replace_handle(|read_only| {
            fs::copy(&source, path)?;
            info!(from = %source.display(), to = %path.display(), "database copied");
            DatabaseHandle::open(path, read_only)
        });

        if let Some(table) = table {
            if self.handle.is_some() && self.tables.contains(&table) {
                self.load_table(&table)?;
            }
        }
        switched
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
