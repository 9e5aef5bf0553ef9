//! Cell formatting
//!
//! Turns raw cell text into fixed-width display strings. All widths are
//! terminal display columns, so CJK and emoji keep box borders aligned.

use crate::db::types::NULL;
use std::borrow::Cow;
use unicode_truncate::{Alignment, UnicodeTruncateStr};
use unicode_width::UnicodeWidthStr;

/// Trailing marker for truncated content
pub const ELLIPSIS: &str = "...";

/// Display width of a string in terminal columns
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Flatten a value to one line: newlines become spaces, edges are trimmed
pub fn sanitize(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r']) {
        Cow::Owned(value.replace(['\n', '\r'], " ").trim().to_string())
    } else {
        Cow::Borrowed(value.trim())
    }
}

/// The text a cell shows before fitting: sanitized, with empty as `null`
pub fn display_text(value: &str) -> Cow<'_, str> {
    let clean = sanitize(value);
    if clean.is_empty() {
        Cow::Borrowed(NULL)
    } else {
        clean
    }
}

/// Truncate to at most `width` columns, ending in [`ELLIPSIS`] when cut.
///
/// Widths of 3 or less have no room for content and yield only dots.
pub fn truncate(s: &str, width: usize) -> Cow<'_, str> {
    if display_width(s) <= width {
        return Cow::Borrowed(s);
    }
    if width <= ELLIPSIS.len() {
        return Cow::Owned(".".repeat(width));
    }
    let (head, _) = s.unicode_truncate(width - ELLIPSIS.len());
    Cow::Owned(format!("{}{}", head, ELLIPSIS))
}

/// Render a cell into exactly `width` display columns
pub fn fit_cell(value: &str, width: usize) -> String {
    let text = display_text(value);
    let cut = truncate(&text, width);
    // A wide char skipped at the cut leaves a gap; padding fills it
    cut.unicode_pad(width, Alignment::Left, true).into_owned()
}
