//! Command line parser with quoting, expansion and globbing.
//!
//! Supports:
//! - Quote handling: `"string with $var"`, `'literal string'`, `{grouped words}`
//! - Variable expansion: `$name`, and `~` for the home directory
//! - Wildcards: `*` and `?` matched against the virtual filesystem
//! - Statement separator: `cmd1; cmd2`
//! - Output redirection: `cmd > file`, `cmd >> file`, `cmd 2> file`
//!
//! A line goes through [`Lexer`] → [`Expander`] → [`Globber`] → option
//! splitting, producing one [`InputArgs`] per statement.

mod expand;
mod glob;
mod lexer;
mod options;

pub use expand::{Expander, GLOB_MARK, has_glob, unmark};
pub use glob::{Globber, segment_to_regex};
pub use lexer::{DEFAULT_STREAM, Lexer, Token, tokenize};
pub use options::{Options, parse_options};

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::keys;
use crate::core::env::Environment;
use crate::core::error::ParseError;
use crate::core::filesystem::VirtualFs;
use crate::models::{InputArgs, RedirectTarget, VfsPath};

// =============================================================================
// Parser
// =============================================================================

/// Parses lines against a snapshot of the environment and filesystem.
///
/// Relative wildcards are matched from the environment's `cwd`.
pub struct InputParser<'a> {
    env: &'a Environment,
    fs: &'a VirtualFs,
}

impl<'a> InputParser<'a> {
    pub fn new(env: &'a Environment, fs: &'a VirtualFs) -> Self {
        Self { env, fs }
    }

    /// Parse a line that must hold at most one statement.
    ///
    /// An empty line gives [`InputArgs`] with an empty command.
    pub fn parse(&self, line: &str) -> Result<InputArgs, ParseError> {
        let mut statements = self.parse_statements(line)?;
        match statements.len() {
            0 => Ok(InputArgs::default()),
            1 => Ok(statements.remove(0)),
            n => Err(ParseError::MultipleStatements(n)),
        }
    }

    /// Parse every `;`-separated statement of a line.
    ///
    /// Empty statements are dropped. Any error fails the whole line.
    pub fn parse_statements(&self, line: &str) -> Result<Vec<InputArgs>, ParseError> {
        let tokens = tokenize(line)?;
        let mut statements = Vec::new();

        for statement in tokens.split(|token| *token == Token::Separator) {
            if statement.is_empty() {
                continue;
            }
            statements.push(self.parse_statement(statement)?);
        }

        debug!(line, count = statements.len(), "parsed line");
        Ok(statements)
    }

    fn parse_statement(&self, tokens: &[Token]) -> Result<InputArgs, ParseError> {
        let expander = Expander::new(self.env);
        let cwd = VfsPath::new(self.env.get_or_default(keys::CWD, "/"));
        let globber = Globber::new(self.fs, cwd);

        let mut words = Vec::new();
        let mut redirects = BTreeMap::new();

        for token in tokens {
            match token {
                Token::Text(raw) => {
                    let expanded = expander.expand(raw)?;
                    words.extend(globber.glob(&expanded)?);
                }
                Token::Redirect {
                    stream,
                    append,
                    target,
                } => {
                    let target = unmark(&expander.expand(target)?);
                    let target = if *append {
                        RedirectTarget::Append(target)
                    } else {
                        RedirectTarget::Write(target)
                    };
                    redirects.insert(*stream, target);
                }
                Token::Separator => {}
            }
        }

        // Leading words that expanded to nothing do not name a command.
        let first = words.iter().position(|word| !word.is_empty()).unwrap_or(words.len());
        let Some((command, rest)) = words[first..].split_first() else {
            return Ok(InputArgs::new("", Default::default(), Vec::new(), redirects));
        };
        let (options, args) = parse_options(rest)?;
        Ok(InputArgs::new(command.clone(), options, args, redirects))
    }
}

/// Quote `text` so that it parses back to exactly one argument equal to it.
pub fn escape_argument(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('\'');
    for c in text.chars() {
        if c == '\\' || c == '\'' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('\'');
    escaped
}

// =============================================================================
// Tests
// =============================================================================
