//! Command registry and execution.
//!
//! This module provides:
//! - [`Command`] describing a builtin and its argument bounds
//! - [`Commands`] registry with argument validation
//! - The builtin catalogue in [`fs`] and [`general`]
//!
//! # Architecture
//!
//! Every command is a plain function over the shell, its parsed input and
//! the standard streams, returning an exit code. The registry checks the
//! argument count before the function runs, so builtins can index their
//! required arguments directly.

mod fs;
mod general;

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::exit_codes;
use crate::core::shell::Shell;
use crate::core::streams::StreamSet;
use crate::models::InputArgs;

/// Signature shared by every builtin.
pub type CommandFn = fn(&mut Shell, &InputArgs, &mut StreamSet) -> i32;

// =============================================================================
// Command
// =============================================================================

/// A registered command.
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub summary: &'static str,
    pub usage: &'static str,
    pub min_args: usize,
    /// `None` for no upper bound.
    pub max_args: Option<usize>,
    pub fun: CommandFn,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .finish_non_exhaustive()
    }
}

impl Command {
    /// True if `argc` positional arguments are acceptable.
    pub fn accepts(&self, argc: usize) -> bool {
        argc >= self.min_args && self.max_args.is_none_or(|max| argc <= max)
    }

    /// Human-readable description of the accepted argument count.
    pub fn expected_args(&self) -> String {
        let plural = |n: usize| if n == 1 { "argument" } else { "arguments" };
        match self.max_args {
            Some(max) if max == self.min_args => format!("Expected {max} {}", plural(max)),
            Some(max) => format!("Expected between {} and {max} arguments", self.min_args),
            None => format!(
                "Expected at least {} {}",
                self.min_args,
                plural(self.min_args)
            ),
        }
    }

    /// Validate the argument count, then run the command.
    pub fn execute(&self, shell: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
        if !self.accepts(input.argc()) {
            streams.err.write_line(&self.expected_args());
            streams.err.write_line(&format!("Usage: {}", self.usage));
            return exit_codes::USAGE;
        }
        (self.fun)(shell, input, streams)
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Commands by name.
#[derive(Clone, Debug, Default)]
pub struct Commands {
    commands: BTreeMap<&'static str, Command>,
}

impl Commands {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every builtin.
    pub fn builtins() -> Self {
        let mut commands = Self::new();
        for command in general::COMMANDS.iter().chain(fs::COMMANDS) {
            commands.register(*command);
        }
        commands
    }

    /// Add a command, replacing any command with the same name.
    pub fn register(&mut self, command: Command) {
        self.commands.insert(command.name, command);
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Command names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    /// Commands, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    /// Run the command named by `input` from the shell's registry.
    ///
    /// An empty command name does nothing and succeeds.
    pub fn execute(shell: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
        let name = input.command();
        if name.is_empty() {
            return exit_codes::OK;
        }

        let Some(command) = shell.commands.get(name).copied() else {
            streams
                .err
                .write_line(&format!("Unknown command '{name}'"));
            return exit_codes::NOT_FOUND;
        };

        debug!(command = name, argc = input.argc(), "executing command");
        command.execute(shell, input, streams)
    }
}

// =============================================================================
// Tests
// =============================================================================
