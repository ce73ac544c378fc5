//! SQLite adapters.
//!
//! The credential store goes through Diesel with embedded migrations; the
//! working database, whose schema is only known at runtime, goes through
//! `rusqlite`. Both link the same bundled SQLite.

pub mod credential;
pub mod database;
pub mod workspace;
