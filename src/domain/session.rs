//! Authenticated session context.

use serde::Serialize;

use super::permission::{can_change_permissions, Permission, Role};

/// Identity, role and permission produced by a successful login.
///
/// A session is immutable for the lifetime of the process; every editor
/// operation consults it before touching the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    username: String,
    role: Role,
    permission: Permission,
}

impl Session {
    pub fn new(username: impl Into<String>, role: Role, permission: Permission) -> Self {
        Self {
            username: username.into(),
            role,
            permission,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn role(&self) -> &Role {
        &self.role
    }

    #[must_use]
    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Summarize what this session may do.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            blocked: self.permission.is_blocked(),
            read: self.permission.has_read_access(),
            write: self.permission.has_write_access(),
            change_permissions: can_change_permissions(&self.role, self.permission),
        }
    }
}

/// Flattened result of the permission checks for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub blocked: bool,
    pub read: bool,
    pub write: bool,
    pub change_permissions: bool,
}
