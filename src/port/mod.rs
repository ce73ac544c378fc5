//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points the application layer talks to.
//! Adapters under [`crate::adapter`] implement them.
//!
//! ```text
//!        ┌─────────────────────────┐
//!        │      Application        │
//!        │  (auth, editor)         │
//!        └───────────┬─────────────┘
//!                    │
//!                    ▼
//!        ┌─────────────────────────┐
//!        │   CredentialStore port  │
//!        └───────────┬─────────────┘
//!                    ▼
//!        ┌─────────────────────────┐
//!        │  SQLite adapter (diesel)│
//!        └─────────────────────────┘
//! ```

pub mod outbound;
