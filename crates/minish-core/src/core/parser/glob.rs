//! Wildcard expansion against the virtual filesystem.
//!
//! Only wildcards marked by the expander take part; everything else in a
//! pattern is matched literally. Matches come back in directory order
//! (lexicographic) and keep the relative or absolute form of the pattern.

use regex::Regex;
use tracing::debug;

use super::expand::{GLOB_MARK, has_glob, unmark};
use crate::core::error::GlobError;
use crate::core::filesystem::VirtualFs;
use crate::models::{Node, VfsPath};

/// Convert one marked path segment into an anchored regex.
///
/// Marked `*` matches any run of non-slash characters and marked `?` exactly
/// one; every other character, including a doubled mark, is literal.
pub fn segment_to_regex(segment: &str) -> Result<Regex, GlobError> {
    let mut pattern = String::from("^");
    let mut literal = String::new();
    let mut chars = segment.chars();

    while let Some(c) = chars.next() {
        if c != GLOB_MARK {
            literal.push(c);
            continue;
        }
        pattern.push_str(&regex::escape(&literal));
        literal.clear();
        match chars.next() {
            Some('*') => pattern.push_str("[^/]*"),
            Some('?') => pattern.push_str("[^/]"),
            Some(other) => literal.push(other),
            None => {}
        }
    }
    pattern.push_str(&regex::escape(&literal));
    pattern.push('$');

    Regex::new(&pattern).map_err(|e| GlobError::InvalidPattern(e.to_string()))
}

/// Expands marked tokens into matching paths.
pub struct Globber<'a> {
    fs: &'a VirtualFs,
    cwd: VfsPath,
}

impl<'a> Globber<'a> {
    /// Relative patterns are resolved against `cwd`.
    pub fn new(fs: &'a VirtualFs, cwd: VfsPath) -> Self {
        Self { fs, cwd }
    }

    /// Expand a token from the expander.
    ///
    /// A token without marked wildcards is returned unmarked. A pattern that
    /// matches nothing is an error, never an empty list.
    pub fn glob(&self, token: &str) -> Result<Vec<String>, GlobError> {
        if !has_glob(token) {
            return Ok(vec![unmark(token)]);
        }

        let segments: Vec<&str> = token.split('/').filter(|s| !s.is_empty()).collect();
        let (start, prefix) = if token.starts_with('/') {
            (VfsPath::root(), "/".to_string())
        } else {
            (self.cwd.clone(), String::new())
        };

        let walk = Walk {
            fs: self.fs,
            trailing_slash: token.ends_with('/'),
        };
        let mut matches = Vec::new();
        walk.descend(&start, &prefix, &segments, &mut matches)?;

        if matches.is_empty() {
            return Err(GlobError::NoMatch {
                pattern: unmark(token),
            });
        }
        debug!(pattern = %unmark(token), count = matches.len(), "glob matched");
        Ok(matches)
    }
}

struct Walk<'a> {
    fs: &'a VirtualFs,
    trailing_slash: bool,
}

impl Walk<'_> {
    /// Match `segments` below `dir`, where `shown` is how `dir` was spelled.
    fn descend(
        &self,
        dir: &VfsPath,
        shown: &str,
        segments: &[&str],
        matches: &mut Vec<String>,
    ) -> Result<(), GlobError> {
        let Some((segment, rest)) = segments.split_first() else {
            return Ok(());
        };

        if *segment == "." || *segment == ".." {
            let next = dir.get_child(segment);
            if self.fs.is_directory(&next) {
                self.visit_directory(&next, &format!("{shown}{segment}"), rest, matches)?;
            }
            return Ok(());
        }

        let Some(Node::Directory(directory)) = self.fs.get(dir) else {
            return Ok(());
        };

        if has_glob(segment) {
            let regex = segment_to_regex(segment)?;
            for (name, node) in directory.nodes() {
                if regex.is_match(name) {
                    self.visit(dir, node, shown, name, rest, matches)?;
                }
            }
        } else {
            let name = unmark(segment);
            if let Some(node) = directory.get(&name) {
                self.visit(dir, node, shown, &name, rest, matches)?;
            }
        }
        Ok(())
    }

    fn visit(
        &self,
        dir: &VfsPath,
        node: &Node,
        shown: &str,
        name: &str,
        rest: &[&str],
        matches: &mut Vec<String>,
    ) -> Result<(), GlobError> {
        let spelled = format!("{shown}{name}");
        match node {
            Node::File(_) => {
                if rest.is_empty() && !self.trailing_slash {
                    matches.push(spelled);
                }
                Ok(())
            }
            Node::Directory(_) => {
                self.visit_directory(&dir.get_child(name), &spelled, rest, matches)
            }
        }
    }

    fn visit_directory(
        &self,
        path: &VfsPath,
        spelled: &str,
        rest: &[&str],
        matches: &mut Vec<String>,
    ) -> Result<(), GlobError> {
        if rest.is_empty() {
            if self.trailing_slash {
                matches.push(format!("{spelled}/"));
            } else {
                matches.push(spelled.to_string());
            }
            return Ok(());
        }
        self.descend(path, &format!("{spelled}/"), rest, matches)
    }
}

// =============================================================================
// Tests
// =============================================================================
