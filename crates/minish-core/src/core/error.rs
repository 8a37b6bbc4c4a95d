//! Error types for the shell core.
//!
//! Each stage has its own error type so callers can branch on the exact
//! failure:
//!
//! - [`LexError`] - Unbalanced quotes, braces or escapes in the raw line
//! - [`ExpandError`] - Malformed variable references
//! - [`GlobError`] - Wildcard patterns that match nothing
//! - [`OptionError`] - Malformed option flags
//! - [`ParseError`] - Any of the above, for the whole-line parser
//! - [`FsError`] - Virtual filesystem operations
//! - [`NodeError`] - Corrupt serialized filesystem data
//! - [`EnvironmentError`] - Environment variable writes
//! - [`ConfigError`] - Loading the TOML configuration

use std::path::PathBuf;

use thiserror::Error;

use crate::models::VfsPath;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated quote")]
    UnterminatedQuote,
    #[error("unterminated brace group")]
    UnterminatedBrace,
    #[error("unterminated escape at end of input")]
    UnterminatedEscape,
    #[error("unexpected '}}'")]
    UnexpectedClosingBrace,
    #[error("missing redirect target")]
    MissingRedirectTarget,
    #[error("invalid stream number '{0}'")]
    InvalidStreamNumber(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error("missing variable name after '$'")]
    MissingVariableName,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlobError {
    #[error("pattern '{pattern}' matches no files")]
    NoMatch { pattern: String },
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("cannot assign a value to multiple options '-{flags}'")]
    ValueForBundledFlags { flags: String },
    #[error("option name missing in '{0}'")]
    EmptyOptionName(String),
}

/// Failure to turn a raw input line into [`InputArgs`](crate::models::InputArgs).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Expand(#[from] ExpandError),
    #[error(transparent)]
    Glob(#[from] GlobError),
    #[error(transparent)]
    Option(#[from] OptionError),
    #[error("expected a single statement but found {0}")]
    MultipleStatements(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("'{0}' does not exist")]
    NotFound(VfsPath),
    #[error("'{0}' already exists")]
    AlreadyExists(VfsPath),
    #[error("parent directory '{0}' does not exist")]
    ParentMissing(VfsPath),
    #[error("'{0}' is not a directory")]
    ParentNotDirectory(VfsPath),
    #[error("'{0}' is not a directory")]
    NotADirectory(VfsPath),
    #[error("'{0}' is a directory")]
    IsADirectory(VfsPath),
    #[error("'{0}' is a directory; use the recursive option")]
    IsDirectoryWithoutRecursive(VfsPath),
    #[error("'{0}' does not exist; cannot put multiple sources at one path")]
    MultipleSourcesNeedDirectory(VfsPath),
    #[error("destination '{0}' is not a directory")]
    DestinationNotDirectory(VfsPath),
    #[error("cannot place '{0}' inside itself")]
    IntoItself(VfsPath),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error("corrupt filesystem data: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    #[error("invalid variable name '{0}' (use letters, numbers, underscores)")]
    InvalidVariableName(String),
    #[error("cannot change read-only variable '{0}'")]
    ReadOnly(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse TOML: {0}")]
    ParseToml(#[from] toml::de::Error),
}
