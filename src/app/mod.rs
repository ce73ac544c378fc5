//! Application wiring: configuration and logging setup.

pub mod config;
