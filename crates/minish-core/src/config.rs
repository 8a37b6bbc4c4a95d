//! Shell configuration.
//!
//! Centralizes the constants used throughout the shell and the
//! [`ShellConfig`] loaded from a TOML file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::error::ConfigError;

// =============================================================================
// Application Metadata
// =============================================================================

/// Host name shown in the prompt.
pub const APP_NAME: &str = "minish";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment keys maintained by the shell.
pub mod keys {
    /// Current working directory.
    pub const CWD: &str = "cwd";
    /// Home directory, substituted for a leading `~`.
    pub const HOME: &str = "home";
    /// Name of the logged-in user.
    pub const USER: &str = "user";
    /// Exit status of the last command.
    pub const STATUS: &str = "status";
}

/// Keys that `set` refuses to change.
pub const READ_ONLY_KEYS: &[&str] = &[keys::CWD, keys::HOME, keys::USER, keys::STATUS];

/// Default user name for a fresh session.
pub const DEFAULT_USER: &str = "user";

/// Default home directory for a fresh session.
pub const DEFAULT_HOME: &str = "/home/user";

// =============================================================================
// Terminal Configuration
// =============================================================================

/// Maximum number of command history entries to keep.
pub const MAX_COMMAND_HISTORY: usize = 100;

/// Exit codes returned by commands.
pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const FAILURE: i32 = 1;
    /// Wrong number of arguments or unparseable input.
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 127;
}

// =============================================================================
// ShellConfig
// =============================================================================

/// User-tunable settings, read from TOML.
///
/// ```toml
/// user = "alice"
/// home = "/home/alice"
/// history_size = 50
/// state_file = ".minish-state.json"
///
/// [variables]
/// editor = "vim"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub user: String,
    pub home: String,
    pub history_size: usize,
    pub state_file: Option<PathBuf>,
    pub variables: BTreeMap<String, String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            home: DEFAULT_HOME.to_string(),
            history_size: MAX_COMMAND_HISTORY,
            state_file: None,
            variables: BTreeMap::new(),
        }
    }
}

impl ShellConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ShellConfig::default();
        assert_eq!(config.user, "user");
        assert_eq!(config.home, "/home/user");
        assert_eq!(config.history_size, MAX_COMMAND_HISTORY);
        assert!(config.state_file.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ShellConfig::from_toml_str("user = \"alice\"\n").unwrap();
        assert_eq!(config.user, "alice");
        assert_eq!(config.home, DEFAULT_HOME);
    }

    #[test]
    fn test_variables_table() {
        let config = ShellConfig::from_toml_str("[variables]\neditor = \"vim\"\n").unwrap();
        assert_eq!(config.variables.get("editor").map(String::as_str), Some("vim"));
    }

    #[test]
    fn test_invalid_toml() {
        let result = ShellConfig::from_toml_str("user = [");
        assert!(matches!(result, Err(ConfigError::ParseToml(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "home = \"/root\"\nhistory_size = 5").unwrap();

        let config = ShellConfig::load(file.path()).unwrap();
        assert_eq!(config.home, "/root");
        assert_eq!(config.history_size, 5);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ShellConfig::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
