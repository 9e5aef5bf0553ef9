//! Dropdown auto-complete engine
//!
//! Proposes SQL keywords and table names for the identifier being typed in
//! the query editor. The completer is a stateful struct owned by `App`; the
//! editor passes in its buffer and cursor and applies the splice returned
//! by [`Completer::accept`].

use crate::sql::formatter::is_ident_char;
use crate::sql::keywords::{KEYWORDS, expects_table};
use std::collections::HashSet;

/// Maximum number of entries in the dropdown
pub const MAX_CANDIDATES: usize = 10;

/// An open dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionState {
    /// Ranked candidates, never empty while open
    pub candidates: Vec<String>,
    /// Index into `candidates`
    pub selected: usize,
    /// Byte offset where the partial identifier begins
    pub start: usize,
}

/// Completion engine: known table names plus the optional open dropdown.
#[derive(Debug, Default)]
pub struct Completer {
    table_names: Vec<String>,
    state: Option<CompletionState>,
}

impl Completer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the table names offered as candidates
    pub fn set_table_names(&mut self, names: Vec<String>) {
        self.table_names = names;
    }

    pub fn table_names(&self) -> &[String] {
        &self.table_names
    }

    /// Open the dropdown for the identifier before `cursor`.
    ///
    /// Returns whether anything matched; with no candidates the dropdown
    /// stays closed.
    pub fn open_at(&mut self, text: &str, cursor: usize) -> bool {
        self.state = self.compute(text, cursor, 0);
        self.state.is_some()
    }

    /// Recompute candidates after an edit; closes when nothing matches.
    pub fn refresh(&mut self, text: &str, cursor: usize) {
        let Some(current) = self.state.as_ref() else {
            return;
        };
        self.state = self.compute(text, cursor, current.selected);
    }

    /// Move the highlight by `delta`, clamped to the list
    pub fn move_selection(&mut self, delta: isize) {
        if let Some(state) = self.state.as_mut() {
            let last = state.candidates.len().saturating_sub(1);
            state.selected = state.selected.saturating_add_signed(delta).min(last);
        }
    }

    /// Splice the selected candidate over `text[start..cursor]` and close.
    ///
    /// Returns the new buffer and cursor, or `None` when closed or when the
    /// recorded span no longer fits the buffer.
    pub fn accept(&mut self, text: &str, cursor: usize) -> Option<(String, usize)> {
        let state = self.state.take()?;
        let candidate = state.candidates.get(state.selected)?;
        if state.start > cursor
            || !text.is_char_boundary(state.start)
            || !text.is_char_boundary(cursor)
        {
            return None;
        }
        let mut out = String::with_capacity(text.len() + candidate.len());
        out.push_str(&text[..state.start]);
        out.push_str(candidate);
        out.push_str(&text[cursor..]);
        Some((out, state.start + candidate.len()))
    }

    /// Close without touching the buffer
    pub fn cancel(&mut self) {
        self.state = None;
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&CompletionState> {
        self.state.as_ref()
    }

    fn compute(&self, text: &str, cursor: usize, selected: usize) -> Option<CompletionState> {
        let before = text.get(..cursor)?;
        let start = prefix_start(before);
        let prefix = &before[start..];
        let candidates = self.candidates_for(context_token(&before[..start]).as_deref(), prefix);
        if candidates.is_empty() {
            return None;
        }
        Some(CompletionState {
            selected: selected.min(candidates.len() - 1),
            candidates,
            start,
        })
    }

    /// Ranked, deduplicated candidates for a context token and prefix
    fn candidates_for(&self, context: Option<&str>, prefix: &str) -> Vec<String> {
        let tables = self.table_names.iter().map(String::as_str);
        let keywords = KEYWORDS.iter().copied();
        let pool: Vec<&str> = match context {
            Some(tok) if expects_table(tok) => tables.collect(),
            Some("SELECT") => std::iter::once("*").chain(keywords).chain(tables).collect(),
            _ => keywords.chain(tables).collect(),
        };

        let prefix_lower = prefix.to_lowercase();
        let mut seen = HashSet::new();
        let mut out: Vec<String> = pool
            .into_iter()
            .filter(|c| !c.is_empty() && c.to_lowercase().starts_with(&prefix_lower))
            .filter(|c| seen.insert(c.to_lowercase()))
            .map(str::to_string)
            .collect();
        out.sort();
        out.truncate(MAX_CANDIDATES);
        out
    }
}

/// Byte offset where the trailing identifier run of `before` starts
pub fn prefix_start(before: &str) -> usize {
    before
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_ident_char(c))
        .last()
        .map_or(before.len(), |(i, _)| i)
}

/// Last whitespace-delimited token of the uppercased text, if any
fn context_token(text: &str) -> Option<String> {
    text.to_uppercase()
        .split_whitespace()
        .last()
        .map(str::to_string)
}
