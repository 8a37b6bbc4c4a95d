//! Shell environment variables.
//!
//! A plain key/value store. Some keys (`cwd`, `home`, `user`, `status`) are
//! maintained by the shell itself and can only be changed through
//! [`Environment::set_special`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::{READ_ONLY_KEYS, keys};
use crate::core::error::EnvironmentError;

/// Check if a variable name is valid.
///
/// Valid names must:
/// - Not be empty
/// - Contain only ASCII alphanumeric characters and underscores
///
/// Names may start with a digit since `$1` style references are legal.
pub fn is_valid_var_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    variables: HashMap<String, String>,
    read_only: BTreeSet<String>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// An empty environment with the standard read-only keys.
    pub fn new() -> Self {
        Self {
            variables: HashMap::new(),
            read_only: READ_ONLY_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn get_or_default<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn has(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    pub fn is_read_only(&self, key: &str) -> bool {
        self.read_only.contains(key)
    }

    /// Set a user variable.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), EnvironmentError> {
        if !is_valid_var_name(key) {
            return Err(EnvironmentError::InvalidVariableName(key.to_string()));
        }
        if self.is_read_only(key) {
            return Err(EnvironmentError::ReadOnly(key.to_string()));
        }
        self.variables.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Set a variable on behalf of the shell, ignoring the read-only list.
    pub fn set_special(&mut self, key: &str, value: impl Into<String>) {
        self.variables.insert(key.to_string(), value.into());
    }

    pub fn unset(&mut self, key: &str) -> Result<(), EnvironmentError> {
        if self.is_read_only(key) {
            return Err(EnvironmentError::ReadOnly(key.to_string()));
        }
        self.variables.remove(key);
        Ok(())
    }

    /// All variables, sorted by key.
    pub fn variables(&self) -> BTreeMap<&str, &str> {
        self.variables
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    /// Exit status of the last command, `0` if none ran yet.
    pub fn status(&self) -> i32 {
        self.get(keys::STATUS)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }
}
