//! Data models for the shell.
//!
//! Contains domain types for:
//! - [`VfsPath`] - Normalized absolute paths
//! - [`Node`], [`File`], [`Directory`] - The virtual filesystem tree
//! - [`InputArgs`], [`RedirectTarget`] - Parsed command lines

mod filesystem;
mod input;
mod path;

pub use filesystem::{Directory, File, FileMode, FileStream, Node};
pub use input::{InputArgs, RedirectTarget};
pub use path::VfsPath;
