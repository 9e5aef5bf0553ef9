//! Keyword case formatting
//!
//! Two entry points share one rule (reserved words become uppercase):
//! [`uppercase_word_before`] fixes the word just finished while typing, and
//! [`format_keywords`] rewrites a whole buffer while leaving quoted string
//! literals alone.

use crate::sql::keywords::is_keyword;

/// Characters that finish a word while typing
pub fn is_trigger(c: char) -> bool {
    matches!(c, ' ' | '\n' | ';')
}

/// Characters that may sit between a finished word and the trigger
fn is_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, ';' | ',' | '(' | ')')
}

/// Characters that make up an identifier
pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Uppercase the keyword that ends just before a trigger at `text[..end]`.
///
/// `end` is the cursor after the trigger was inserted. Keywords are ASCII, so
/// byte offsets (and the cursor) are unchanged. Returns whether the buffer
/// was modified.
pub fn uppercase_word_before(text: &mut String, end: usize) -> bool {
    let Some(before) = text.get(..end) else {
        return false;
    };
    let mut chars = before.char_indices().rev().peekable();

    match chars.next() {
        Some((_, c)) if is_trigger(c) => {}
        _ => return false,
    }
    while chars.next_if(|&(_, c)| is_boundary(c)).is_some() {}

    let Some(&(last, last_char)) = chars.peek() else {
        return false;
    };
    let word_end = last + last_char.len_utf8();
    let mut word_start = word_end;
    while let Some((i, _)) = chars.next_if(|&(_, c)| c.is_alphabetic() || c == '_') {
        word_start = i;
    }
    if word_start == word_end {
        return false;
    }
    // Tail of a longer identifier such as `my_from` or `t.select`
    if chars.peek().is_some_and(|&(_, c)| is_ident_char(c)) {
        return false;
    }

    let word = &text[word_start..word_end];
    if !is_keyword(word) || !word.bytes().any(|b| b.is_ascii_lowercase()) {
        return false;
    }
    let upper = word.to_ascii_uppercase();
    text.replace_range(word_start..word_end, &upper);
    true
}

/// Scanner state for [`format_keywords`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    /// Inside a literal opened by this quote character
    InString(char),
}

/// Uppercase every keyword token outside quoted literals.
///
/// A quote only toggles state when it matches the quote that opened the
/// current literal, so `'say "from"'` and `"it's"` pass through untouched.
pub fn format_keywords(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut word = String::new();
    let mut state = ScanState::Outside;

    for c in sql.chars() {
        match state {
            ScanState::InString(quote) => {
                out.push(c);
                if c == quote {
                    state = ScanState::Outside;
                }
            }
            ScanState::Outside if is_ident_char(c) => word.push(c),
            ScanState::Outside => {
                flush_word(&mut out, &mut word);
                out.push(c);
                if c == '\'' || c == '"' {
                    state = ScanState::InString(c);
                }
            }
        }
    }
    flush_word(&mut out, &mut word);
    out
}

fn flush_word(out: &mut String, word: &mut String) {
    if is_keyword(word.as_str()) {
        out.push_str(&word.to_ascii_uppercase());
    } else {
        out.push_str(word.as_str());
    }
    word.clear();
}
