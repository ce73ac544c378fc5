//! Permission tiers and the access checks derived from them.
//!
//! Every account carries one of four stored permission strings. The checks
//! here are pure classifications; the editor decides which check guards
//! which operation.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::DomainError;

/// Role name that grants permission management regardless of tier.
pub const ADMIN_ROLE: &str = "admin";

/// Stored permission tier of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Permission {
    /// May browse and query, never modify.
    #[serde(rename = "Read-only")]
    ReadOnly,
    /// May browse and modify.
    #[serde(rename = "Write")]
    Write,
    /// May browse, modify and manage permissions.
    #[serde(rename = "Full write")]
    FullWrite,
    /// May not open databases at all.
    #[serde(rename = "Closed")]
    Closed,
}

impl Permission {
    /// All tiers in declaration order.
    pub const ALL: [Permission; 4] = [
        Permission::ReadOnly,
        Permission::Write,
        Permission::FullWrite,
        Permission::Closed,
    ];

    /// The string stored in the credential table for this tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadOnly => "Read-only",
            Self::Write => "Write",
            Self::FullWrite => "Full write",
            Self::Closed => "Closed",
        }
    }

    /// True iff the tier is `Closed`.
    #[must_use]
    pub const fn is_blocked(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// True for `Write` and `Full write`.
    #[must_use]
    pub const fn has_write_access(self) -> bool {
        matches!(self, Self::Write | Self::FullWrite)
    }

    /// True for every tier except `Closed`.
    #[must_use]
    pub const fn has_read_access(self) -> bool {
        matches!(self, Self::ReadOnly | Self::Write | Self::FullWrite)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| DomainError::UnknownPermission(s.to_string()))
    }
}

/// Account role. Only `admin` carries meaning; anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Other(String),
}

impl Role {
    /// The role string as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => ADMIN_ROLE,
            Self::Other(name) => name,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        if s == ADMIN_ROLE {
            Self::Admin
        } else {
            Self::Other(s.to_string())
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        if s == ADMIN_ROLE {
            Self::Admin
        } else {
            Self::Other(s)
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// True if the role is admin or the tier is `Full write`.
#[must_use]
pub fn can_change_permissions(role: &Role, permission: Permission) -> bool {
    role.is_admin() || permission == Permission::FullWrite
}
