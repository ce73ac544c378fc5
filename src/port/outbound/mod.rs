//! Outbound ports.

pub mod credential;
