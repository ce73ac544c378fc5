//! Application services (use cases).
//!
//! These services coordinate domain rules with the outbound adapters:
//! login against the credential store and the editor operations over the
//! working database.

pub mod auth;
pub mod editor;
