//! Credential database modules.
//!
//! Provides connection management, schema definitions, and Diesel model
//! types for the credential store.

pub mod connection;
pub mod model;
pub mod schema;
