//! Engine-agnostic domain types.
//!
//! - [`permission`] - permission tiers, roles and the access checks
//! - [`session`] - the immutable session produced by login
//! - [`cell`] - cell values and displayed rows
//! - [`schema`] - table descriptors and identifier validation
//! - [`grid`] - sort toggling and the row deletion policy
//! - [`template`] - schemas for new database files

pub mod cell;
pub mod error;
pub mod grid;
pub mod permission;
pub mod schema;
pub mod session;
pub mod template;
