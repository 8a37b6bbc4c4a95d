//! Line-editor integration for tab completion.

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use minish_core::core::{AutocompleteResult, Shell, autocomplete};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

pub struct MinishHelper {
    shell: Rc<RefCell<Shell>>,
}

impl MinishHelper {
    pub fn new(shell: Rc<RefCell<Shell>>) -> Self {
        Self { shell }
    }

    /// Candidates replacing everything before the cursor.
    ///
    /// With several matches every candidate carries the same replacement (the
    /// line extended to the common prefix) so the editor inserts that and lists
    /// the names.
    fn candidates(&self, line_to_cursor: &str) -> Vec<Pair> {
        let Ok(shell) = self.shell.try_borrow() else {
            return Vec::new();
        };

        match autocomplete(line_to_cursor, &shell) {
            AutocompleteResult::Single(completed) => vec![Pair {
                display: completed.clone(),
                replacement: completed,
            }],
            AutocompleteResult::Multiple(common, names) => names
                .into_iter()
                .map(|display| Pair {
                    display,
                    replacement: common.clone(),
                })
                .collect(),
            AutocompleteResult::None => Vec::new(),
        }
    }
}

impl Completer for MinishHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok((0, self.candidates(&line[..pos])))
    }
}

impl Hinter for MinishHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for MinishHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Borrowed(hint)
    }
}

impl Validator for MinishHelper {}

impl Helper for MinishHelper {}
