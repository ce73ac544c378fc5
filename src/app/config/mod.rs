//! Application configuration loading and validation.
//!
//! Configuration is an optional TOML file. Every section and field has a
//! default, so an empty file and a missing default file behave the same.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::application::editor::EditorSettings;
use crate::domain::grid::DeleteMatch;
use crate::error::{ConfigError, Result};

mod logging;

pub use logging::LoggingConfig;

/// Locations of the working database and the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Working database opened at startup; created when missing.
    pub path: PathBuf,
    /// Credential store consulted at login.
    pub credentials: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("example.db"),
            credentials: PathBuf::from("user_auth.db"),
        }
    }
}

/// Grid behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Upper bound on rows loaded per table. Unlimited when absent.
    pub row_limit: Option<u32>,
    pub delete_match: DeleteMatch,
}

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load and validate the file at `path`, which must exist.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration text.
    #[allow(clippy::result_large_err)]
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given; otherwise load `default_path` when it
    /// exists, falling back to built-in defaults.
    #[allow(clippy::result_large_err)]
    pub fn resolve(explicit: Option<&Path>, default_path: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if default_path.exists() => Self::load(default_path),
            None => Ok(Self::default()),
        }
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.editor.row_limit == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "editor.row_limit",
                reason: "must be greater than 0".into(),
            }
            .into());
        }
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path",
                reason: "must not be empty".into(),
            }
            .into());
        }
        if self.database.credentials.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.credentials",
                reason: "must not be empty".into(),
            }
            .into());
        }
        self.logging.validate()?;
        Ok(())
    }

    /// Editor knobs derived from the `[editor]` section.
    #[must_use]
    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            row_limit: self.editor.row_limit,
            delete_match: self.editor.delete_match,
        }
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self, verbosity: u8) {
        self.logging.init(verbosity);
    }
}
