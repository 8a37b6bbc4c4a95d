//! Expansion of a single raw text token.
//!
//! Handles:
//! - Variable expansion (`$name` → value, empty if unset)
//! - Home expansion (leading `~` → `home`)
//! - Escape removal (`\;`, `\ `, `\$`, ...)
//! - Quote and brace removal
//! - Wildcard marking for the globber
//!
//! Unquoted `*` and `?` are not expanded here. They are prefixed with
//! [`GLOB_MARK`] so the globber can tell them apart from escaped or quoted
//! wildcards without knowing the quoting context.

use tracing::trace;

use crate::config::keys;
use crate::core::env::Environment;
use crate::core::error::ExpandError;

/// Prefix placed before a wildcard that should be globbed.
///
/// A literal occurrence of the mark itself, from the line or from a variable
/// value, is written twice. Only mark+`*` and mark+`?` are wildcards.
pub const GLOB_MARK: char = '\u{E000}';

/// Characters a backslash outside quotes turns into literals.
const ESCAPABLE: &[char] = &['\\', ' ', ';', '~', '$', '>', '?', '*', '\'', '"', '{', '}'];

/// True if the token contains a wildcard marked for globbing.
pub fn has_glob(token: &str) -> bool {
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c == GLOB_MARK && matches!(chars.next(), Some('*' | '?')) {
            return true;
        }
    }
    false
}

/// Strip glob marks, leaving the wildcards as literal characters.
pub fn unmark(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c == GLOB_MARK {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Append a literal character, doubling it if it is the glob mark.
fn push_literal_char(out: &mut String, c: char) {
    if c == GLOB_MARK {
        out.push(GLOB_MARK);
    }
    out.push(c);
}

fn push_literal(out: &mut String, text: &str) {
    text.chars().for_each(|c| push_literal_char(out, c));
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Expands raw tokens against an environment.
pub struct Expander<'a> {
    env: &'a Environment,
}

impl<'a> Expander<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Self { env }
    }

    /// Expand one token.
    ///
    /// The token must already be balanced; the lexer guarantees this.
    pub fn expand(&self, token: &str) -> Result<String, ExpandError> {
        let mut out = String::with_capacity(token.len());
        let mut chars = token.chars().peekable();
        let mut in_single_quote = false;
        let mut in_double_quote = false;
        let mut brace_depth = 0usize;

        if let Some(rest) = token.strip_prefix('~')
            && (rest.is_empty() || rest.starts_with('/'))
        {
            let home = self.env.get_or_default(keys::HOME, "~").trim_end_matches('/');
            if home.is_empty() && rest.is_empty() {
                out.push('/');
            } else {
                push_literal(&mut out, home);
            }
            chars.next();
        }

        while let Some(c) = chars.next() {
            let in_quotes = in_single_quote || in_double_quote;
            match c {
                '\\' => {
                    let Some(&next) = chars.peek() else {
                        out.push(c);
                        break;
                    };
                    let escaped = if in_single_quote {
                        next == '\'' || next == '\\'
                    } else if in_double_quote {
                        next == '"' || next == '\\'
                    } else {
                        ESCAPABLE.contains(&next)
                    };
                    if !escaped {
                        out.push(c);
                    }
                    push_literal_char(&mut out, next);
                    chars.next();
                }
                '\'' if !in_double_quote => in_single_quote = !in_single_quote,
                '"' if !in_single_quote => in_double_quote = !in_double_quote,
                '{' if !in_quotes => brace_depth += 1,
                '}' if !in_quotes && brace_depth > 0 => brace_depth -= 1,
                '$' if !in_single_quote => {
                    let mut name = String::new();
                    while let Some(next) = chars.next_if(|&n| is_name_char(n)) {
                        name.push(next);
                    }
                    if name.is_empty() {
                        return Err(ExpandError::MissingVariableName);
                    }
                    push_literal(&mut out, self.env.get(&name).unwrap_or_default());
                }
                '*' | '?' if !in_quotes => {
                    out.push(GLOB_MARK);
                    out.push(c);
                }
                _ => push_literal_char(&mut out, c),
            }
        }

        trace!(token, expanded = %out, "expanded token");
        Ok(out)
    }
}

// =============================================================================
// Tests
// =============================================================================
