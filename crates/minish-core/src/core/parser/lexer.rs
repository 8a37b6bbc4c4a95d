//! Lexer for tokenizing shell input.
//!
//! Handles:
//! - Word splitting on unquoted, ungrouped spaces
//! - Single and double quotes, `{...}` groups and backslash escapes
//! - Statement separators (`;`)
//! - Output redirection (`>`, `>>`, `2>`, ...)
//!
//! Text tokens keep their quotes, braces and escapes. The expander reads them
//! again to decide what gets substituted, so only the boundaries are decided
//! here.

use std::iter::Peekable;
use std::str::Chars;

use tracing::trace;

use crate::core::error::LexError;

// =============================================================================
// Token Types
// =============================================================================

/// Token types produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A word (command name, option or argument), still quoted
    Text(String),
    /// Output redirect `N>target` or `N>>target`
    Redirect {
        stream: u32,
        append: bool,
        target: String,
    },
    /// Statement separator `;`
    Separator,
}

/// Stream number used when a redirect has no numeric prefix.
pub const DEFAULT_STREAM: u32 = 1;

// =============================================================================
// Lexer
// =============================================================================

/// Lexer for tokenizing shell input
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    tokens: Vec<Token>,
    current: String,
    in_single_quote: bool,
    in_double_quote: bool,
    brace_depth: usize,
    /// `(stream, append)` of a redirect whose target is being read.
    pending_redirect: Option<(u32, bool)>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            tokens: Vec::new(),
            current: String::new(),
            in_single_quote: false,
            in_double_quote: false,
            brace_depth: 0,
            pending_redirect: None,
        }
    }

    /// Tokenize the entire input.
    ///
    /// Fails without returning any tokens if a quote, brace group or escape
    /// is left open.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(c) = self.chars.next() {
            match c {
                '\\' => self.read_escape()?,
                '\'' if !self.in_double_quote => {
                    self.in_single_quote = !self.in_single_quote;
                    self.current.push(c);
                }
                '"' if !self.in_single_quote => {
                    self.in_double_quote = !self.in_double_quote;
                    self.current.push(c);
                }
                '{' if !self.in_quotes() => {
                    self.brace_depth += 1;
                    self.current.push(c);
                }
                '}' if !self.in_quotes() => {
                    if self.brace_depth == 0 {
                        return Err(LexError::UnexpectedClosingBrace);
                    }
                    self.brace_depth -= 1;
                    self.current.push(c);
                }
                ' ' if self.is_bare() => self.flush()?,
                ';' if self.is_bare() => {
                    self.flush()?;
                    if self.tokens.last() != Some(&Token::Separator) {
                        self.tokens.push(Token::Separator);
                    }
                }
                '>' if self.is_bare() => self.read_redirect()?,
                _ => self.current.push(c),
            }
        }

        if self.in_quotes() {
            return Err(LexError::UnterminatedQuote);
        }
        if self.brace_depth > 0 {
            return Err(LexError::UnterminatedBrace);
        }
        self.flush()?;

        trace!(tokens = ?self.tokens, "tokenized input");
        Ok(self.tokens)
    }

    fn in_quotes(&self) -> bool {
        self.in_single_quote || self.in_double_quote
    }

    /// Outside every quote and brace group.
    fn is_bare(&self) -> bool {
        !self.in_quotes() && self.brace_depth == 0
    }

    /// Handle a backslash; the backslash itself has been consumed.
    ///
    /// Outside quotes the next character is always taken literally. Inside
    /// quotes only the active quote character and backslash are escaped.
    fn read_escape(&mut self) -> Result<(), LexError> {
        let next = *self.chars.peek().ok_or(LexError::UnterminatedEscape)?;
        let escapes = if self.in_single_quote {
            next == '\'' || next == '\\'
        } else if self.in_double_quote {
            next == '"' || next == '\\'
        } else {
            true
        };

        self.current.push('\\');
        if escapes {
            self.current.push(next);
            self.chars.next();
        }
        Ok(())
    }

    /// Start a redirect; the first `>` has been consumed.
    fn read_redirect(&mut self) -> Result<(), LexError> {
        if self.pending_redirect.is_some() && self.current.is_empty() {
            return Err(LexError::MissingRedirectTarget);
        }

        let stream = match self.stream_number()? {
            Some(stream) => {
                self.current.clear();
                stream
            }
            None => {
                self.flush()?;
                DEFAULT_STREAM
            }
        };

        let append = self.chars.next_if_eq(&'>').is_some();
        while self.chars.next_if_eq(&' ').is_some() {}

        self.pending_redirect = Some((stream, append));
        Ok(())
    }

    /// The in-progress word as a stream number, if it is a bare integer.
    ///
    /// Digits that do not fit a stream number are an error rather than an
    /// argument.
    fn stream_number(&self) -> Result<Option<u32>, LexError> {
        if self.pending_redirect.is_some()
            || self.current.is_empty()
            || !self.current.chars().all(|c| c.is_ascii_digit())
        {
            return Ok(None);
        }
        self.current
            .parse()
            .map(Some)
            .map_err(|_| LexError::InvalidStreamNumber(self.current.clone()))
    }

    /// End the in-progress token, if any.
    fn flush(&mut self) -> Result<(), LexError> {
        if let Some((stream, append)) = self.pending_redirect.take() {
            if self.current.is_empty() {
                return Err(LexError::MissingRedirectTarget);
            }
            self.tokens.push(Token::Redirect {
                stream,
                append,
                target: std::mem::take(&mut self.current),
            });
        } else if !self.current.is_empty() {
            self.tokens
                .push(Token::Text(std::mem::take(&mut self.current)));
        }
        Ok(())
    }
}

/// Tokenize a line of input.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    fn redirect(stream: u32, append: bool, target: &str) -> Token {
        Token::Redirect {
            stream,
            append,
            target: target.to_string(),
        }
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(tokenize("ls").unwrap(), vec![text("ls")]);
    }

    #[test]
    fn test_command_with_args() {
        assert_eq!(
            tokenize("ls  -la   /home").unwrap(),
            vec![text("ls"), text("-la"), text("/home")]
        );
    }

    #[test]
    fn test_single_quotes_group_words() {
        assert_eq!(
            tokenize("echo 'a b' c").unwrap(),
            vec![text("echo"), text("'a b'"), text("c")]
        );
    }

    #[test]
    fn test_double_quotes_group_words() {
        assert_eq!(
            tokenize("echo \"hello world\"").unwrap(),
            vec![text("echo"), text("\"hello world\"")]
        );
    }

    #[test]
    fn test_quotes_do_not_nest() {
        assert_eq!(
            tokenize("echo \"it's\" 'say \"hi\"'").unwrap(),
            vec![text("echo"), text("\"it's\""), text("'say \"hi\"'")]
        );
    }

    #[test]
    fn test_braces_group_words() {
        assert_eq!(
            tokenize("echo {a {b} c} d").unwrap(),
            vec![text("echo"), text("{a {b} c}"), text("d")]
        );
    }

    #[test]
    fn test_braces_inside_quotes_are_literal() {
        assert_eq!(tokenize("echo '}'").unwrap(), vec![text("echo"), text("'}'")]);
    }

    #[test]
    fn test_escaped_space_joins_words() {
        assert_eq!(
            tokenize("cat a\\ b").unwrap(),
            vec![text("cat"), text("a\\ b")]
        );
    }

    #[test]
    fn test_escaped_quote_inside_quotes() {
        assert_eq!(
            tokenize("echo 'it\\'s'").unwrap(),
            vec![text("echo"), text("'it\\'s'")]
        );
    }

    #[test]
    fn test_separator() {
        assert_eq!(
            tokenize("a; b;; ;c").unwrap(),
            vec![
                text("a"),
                Token::Separator,
                text("b"),
                Token::Separator,
                text("c"),
            ]
        );
    }

    #[test]
    fn test_quoted_separator_is_text() {
        assert_eq!(tokenize("echo ';'").unwrap(), vec![text("echo"), text("';'")]);
    }

    #[test]
    fn test_redirect_write() {
        assert_eq!(
            tokenize("cmd > out.txt").unwrap(),
            vec![text("cmd"), redirect(1, false, "out.txt")]
        );
    }

    #[test]
    fn test_redirect_append() {
        assert_eq!(
            tokenize("cmd >> out.txt").unwrap(),
            vec![text("cmd"), redirect(1, true, "out.txt")]
        );
    }

    #[test]
    fn test_redirect_without_spaces() {
        assert_eq!(
            tokenize("cmd>out.txt arg").unwrap(),
            vec![text("cmd"), redirect(1, false, "out.txt"), text("arg")]
        );
    }

    #[test]
    fn test_redirect_stream_number() {
        assert_eq!(
            tokenize("cmd 2>> err.log").unwrap(),
            vec![text("cmd"), redirect(2, true, "err.log")]
        );
    }

    #[test]
    fn test_oversized_stream_number() {
        assert_eq!(
            tokenize("echo 99999999999>f"),
            Err(LexError::InvalidStreamNumber("99999999999".to_string()))
        );
    }

    #[test]
    fn test_detached_number_is_an_argument() {
        assert_eq!(
            tokenize("echo 2 > f").unwrap(),
            vec![text("echo"), text("2"), redirect(1, false, "f")]
        );
    }

    #[test]
    fn test_redirect_quoted_target() {
        assert_eq!(
            tokenize("cmd > 'my file'").unwrap(),
            vec![text("cmd"), redirect(1, false, "'my file'")]
        );
    }

    #[test]
    fn test_redirect_missing_target() {
        assert_eq!(tokenize("cmd >"), Err(LexError::MissingRedirectTarget));
        assert_eq!(tokenize("cmd > ; ls"), Err(LexError::MissingRedirectTarget));
        assert_eq!(tokenize("cmd > > f"), Err(LexError::MissingRedirectTarget));
    }

    #[test]
    fn test_quoted_redirect_is_text() {
        assert_eq!(
            tokenize("echo '>' x").unwrap(),
            vec![text("echo"), text("'>'"), text("x")]
        );
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(tokenize("echo 'abc"), Err(LexError::UnterminatedQuote));
        assert_eq!(tokenize("echo \"abc"), Err(LexError::UnterminatedQuote));
    }

    #[test]
    fn test_unterminated_brace() {
        assert_eq!(tokenize("echo {abc"), Err(LexError::UnterminatedBrace));
    }

    #[test]
    fn test_unexpected_closing_brace() {
        assert_eq!(tokenize("echo }"), Err(LexError::UnexpectedClosingBrace));
    }

    #[test]
    fn test_trailing_escape() {
        assert_eq!(tokenize("echo abc\\"), Err(LexError::UnterminatedEscape));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![]);
        assert_eq!(tokenize("   ").unwrap(), vec![]);
    }
}
