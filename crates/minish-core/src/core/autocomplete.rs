//! Tab completion for command names and paths.
//!
//! The first word of a line completes against the registered commands; any
//! later word completes against the virtual filesystem. `cd` only offers
//! directories. Matching is case-sensitive, like the filesystem itself.
//!
//! The completion system supports:
//! - Single match: Complete immediately
//! - Multiple matches: Show common prefix and all options

use crate::core::shell::Shell;
use crate::models::{Node, VfsPath};

// ============================================================================
// Public Types
// ============================================================================

/// Result of an autocomplete attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutocompleteResult {
    /// Single match - the whole input line, completed.
    Single(String),
    /// Multiple matches - (input extended to the common prefix, match names).
    Multiple(String, Vec<String>),
    /// No matches found.
    None,
}

/// Commands whose arguments are always directories.
const DIR_COMMANDS: &[&str] = &["cd"];

// ============================================================================
// Public API
// ============================================================================

/// Complete the last word of `input`.
pub fn autocomplete(input: &str, shell: &Shell) -> AutocompleteResult {
    let input = input.trim_start();
    if input.is_empty() {
        return AutocompleteResult::None;
    }

    match input.rsplit_once(' ') {
        None => complete_command(input, shell),
        Some((head, partial)) => {
            let command = head.split(' ').next().unwrap_or_default();
            complete_path(head, partial, shell, DIR_COMMANDS.contains(&command))
        }
    }
}

// ============================================================================
// Command Completion
// ============================================================================

fn complete_command(partial: &str, shell: &Shell) -> AutocompleteResult {
    let matches: Vec<String> = shell
        .commands
        .names()
        .filter(|name| name.starts_with(partial))
        .map(str::to_string)
        .collect();

    match matches.len() {
        0 => AutocompleteResult::None,
        1 => AutocompleteResult::Single(format!("{} ", matches[0])),
        _ => AutocompleteResult::Multiple(find_common_prefix(&matches), matches),
    }
}

// ============================================================================
// Path Completion
// ============================================================================

fn complete_path(head: &str, partial: &str, shell: &Shell, dirs_only: bool) -> AutocompleteResult {
    let (dir_part, name_part) = match partial.rfind('/') {
        Some(idx) => (&partial[..=idx], &partial[idx + 1..]),
        None => ("", partial),
    };

    let search_dir = match dir_part.strip_prefix("~/") {
        Some(rest) => VfsPath::interpret(&shell.home(), rest),
        None => shell.resolve(dir_part),
    };
    let Some(Node::Directory(dir)) = shell.fs.get(&search_dir) else {
        return AutocompleteResult::None;
    };

    let show_hidden = name_part.starts_with('.');
    let matches: Vec<(&str, bool)> = dir
        .nodes()
        .iter()
        .filter(|(name, node)| {
            name.starts_with(name_part)
                && (show_hidden || !name.starts_with('.'))
                && (!dirs_only || node.is_directory())
        })
        .map(|(name, node)| (name.as_str(), node.is_directory()))
        .collect();

    match matches.as_slice() {
        [] => AutocompleteResult::None,
        [(name, is_dir)] => {
            let suffix = if *is_dir { "/" } else { " " };
            AutocompleteResult::Single(format!("{head} {dir_part}{name}{suffix}"))
        }
        _ => {
            let paths: Vec<String> = matches
                .iter()
                .map(|(name, _)| format!("{dir_part}{name}"))
                .collect();
            let common = find_common_prefix(&paths);
            let display_names = matches
                .iter()
                .map(|(name, is_dir)| {
                    if *is_dir {
                        format!("{name}/")
                    } else {
                        name.to_string()
                    }
                })
                .collect();
            AutocompleteResult::Multiple(format!("{head} {common}"), display_names)
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Find the longest prefix shared by every string.
pub fn find_common_prefix(strings: &[String]) -> String {
    let Some((first, rest)) = strings.split_first() else {
        return String::new();
    };

    let mut prefix_len = first.len();
    for s in rest {
        prefix_len = first
            .char_indices()
            .zip(s.chars())
            .take_while(|((idx, a), b)| *idx < prefix_len && a == b)
            .map(|((idx, a), _)| idx + a.len_utf8())
            .last()
            .unwrap_or(0);
    }

    first[..prefix_len].to_string()
}

// ============================================================================
// Tests
// ============================================================================
