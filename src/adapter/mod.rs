//! Implementations of ports (hexagonal adapters).
//!
//! - `inbound::cli` drives the application from the terminal
//! - `outbound::sqlite` holds the credential store and the working database

pub mod inbound;
pub mod outbound;
