//! Built-in schemas for new database files.

use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// Schema applied to a freshly created database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// `users(id, name, age)` and `data(id, address, email)`.
    User,
    /// `Customers`, `Warehouse` and `Shop`.
    Business,
}

const USER_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY, name TEXT, age INTEGER)",
    "CREATE TABLE IF NOT EXISTS data (id INTEGER PRIMARY KEY, address TEXT, email TEXT)",
];

const BUSINESS_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS Customers (id INTEGER PRIMARY KEY, name TEXT, \"order\" TEXT, \"previous orders\" TEXT)",
    "CREATE TABLE IF NOT EXISTS Warehouse (id INTEGER PRIMARY KEY, item TEXT, stock INTEGER, price REAL)",
    "CREATE TABLE IF NOT EXISTS Shop (id INTEGER PRIMARY KEY, item TEXT, customer TEXT, price REAL)",
];

impl Template {
    pub const ALL: [Template; 2] = [Template::User, Template::Business];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Business => "business",
        }
    }

    /// DDL statements creating this template's tables, in order.
    #[must_use]
    pub const fn statements(self) -> &'static [&'static str] {
        match self {
            Self::User => USER_STATEMENTS,
            Self::Business => BUSINESS_STATEMENTS,
        }
    }

    /// Names of the tables the template creates.
    #[must_use]
    pub const fn table_names(self) -> &'static [&'static str] {
        match self {
            Self::User => &["users", "data"],
            Self::Business => &["Customers", "Warehouse", "Shop"],
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Template {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| DomainError::UnknownTemplate(s.to_string()))
    }
}
