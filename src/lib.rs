//! opendoc - a terminal browser and editor for SQLite database files.
//!
//! Users log in against a local credential table and get a table browser,
//! an editable grid and a SQL console over one working database file. Every
//! operation is gated by the session's permission tier.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Permissions, sessions, cell values, table descriptors,
//!   sort state and templates. No I/O.
//! - [`port`] - Traits the application needs from the outside world.
//! - [`application`] - Login and the editor operations over explicit
//!   [`application::editor::EditorState`].
//! - [`adapter`] - SQLite adapters and the terminal front end.
//! - [`app`] - Configuration and logging setup.
//! - [`error`] - Error types for the crate.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use opendoc::adapter::outbound::sqlite::credential::SqliteCredentialStore;
//! use opendoc::application::auth::Authenticator;
//! use opendoc::application::editor::{EditorSettings, EditorState};
//!
//! # fn main() -> opendoc::error::Result<()> {
//! let store = SqliteCredentialStore::open(Path::new("user_auth.db"))?;
//! let session = Authenticator::new(store).login("admin", "admin123")?;
//!
//! let mut editor = EditorState::new(session, EditorSettings::default());
//! editor.open_or_create_file(Path::new("example.db"))?;
//! for table in editor.list_tables()? {
//!     println!("{table}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod application;
pub mod domain;
pub mod error;
pub mod port;
