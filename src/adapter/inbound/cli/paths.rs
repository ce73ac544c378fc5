//! Path utilities for opendoc.
//!
//! Per-user files live under `~/.opendoc/`:
//! - `~/.opendoc/config.toml` - optional configuration
//! - `~/.opendoc/history.txt` - shell history

use std::path::PathBuf;

/// Returns the opendoc home directory (`~/.opendoc/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".opendoc")
}

/// Returns the default config file path (`~/.opendoc/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the shell history file path (`~/.opendoc/history.txt`).
pub fn history_file() -> PathBuf {
    home_dir().join("history.txt")
}

/// Ensures the opendoc home directory exists.
pub fn ensure_home_dir() -> std::io::Result<()> {
    std::fs::create_dir_all(home_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_under_opendoc_home() {
        let home = home_dir();
        assert!(home.to_string_lossy().contains(".opendoc"));
        assert!(default_config().starts_with(&home));
        assert!(history_file().starts_with(&home));
    }
}
