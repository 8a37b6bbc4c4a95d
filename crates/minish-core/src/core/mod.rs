//! Core shell behaviour.
//!
//! This module provides:
//! - [`VirtualFs`] in-memory filesystem management
//! - [`InputParser`] turning raw lines into [`InputArgs`](crate::models::InputArgs)
//! - [`Shell`] sessions with [`Commands`], [`Environment`] and [`InputHistory`]
//! - [`autocomplete`] for tab completion

mod autocomplete;
pub mod commands;
pub mod env;
pub mod error;
mod filesystem;
mod history;
pub mod parser;
mod shell;
pub mod streams;

pub use autocomplete::{AutocompleteResult, autocomplete, find_common_prefix};
pub use commands::{Command, CommandFn, Commands};
pub use env::Environment;
pub use filesystem::VirtualFs;
pub use history::InputHistory;
pub use parser::{InputParser, Token, escape_argument, tokenize};
pub use shell::Shell;
