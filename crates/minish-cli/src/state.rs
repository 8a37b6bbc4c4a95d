//! Session persistence.
//!
//! The whole session (filesystem tree, variables and history) is written to a
//! single JSON file after every line and read back at startup.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use minish_core::config::{ShellConfig, keys};
use minish_core::core::{InputHistory, Shell, VirtualFs};
use minish_core::models::Node;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub root: Node,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub history: Vec<String>,
}

impl SessionState {
    /// Snapshot a running shell.
    pub fn capture(shell: &Shell) -> Self {
        Self {
            root: shell.fs.root().clone(),
            variables: shell
                .env
                .variables()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            history: shell.history.entries().map(str::to_string).collect(),
        }
    }

    /// Rebuild a shell from this snapshot.
    ///
    /// A saved working directory that no longer exists falls back to home.
    pub fn restore(self, config: &ShellConfig) -> Shell {
        let mut shell = match self.root {
            Node::Directory(root) => Shell::with_filesystem(config, VirtualFs::from_root(root)),
            Node::File(_) => {
                warn!("saved root is not a directory, starting a fresh session");
                return Shell::new(config);
            }
        };

        for (key, value) in self.variables {
            shell.env.set_special(&key, value);
        }
        if !shell.fs.is_directory(&shell.cwd()) {
            let home = shell.home();
            shell.env.set_special(keys::CWD, home.as_str());
        }
        shell.history = InputHistory::from_entries(config.history_size, self.history);
        shell
    }

    /// Read a saved session.
    ///
    /// Returns `None` when there is no file yet, or when it cannot be read or
    /// parsed; the latter is logged.
    pub fn load(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no saved session");
                return None;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read saved session");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "saved session is corrupt, starting fresh");
                None
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "saved session");
        Ok(())
    }
}

/// Load the session at `path` if there is one, otherwise start fresh.
pub fn open_session(config: &ShellConfig, path: Option<&Path>) -> Shell {
    match path.and_then(SessionState::load) {
        Some(state) => state.restore(config),
        None => Shell::new(config),
    }
}
