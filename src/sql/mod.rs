//! SQL utilities
//!
//! Keyword table, keyword case formatting and statement generation.

pub mod formatter;
pub mod generate;
pub mod keywords;

pub use formatter::{format_keywords, uppercase_word_before};
pub use keywords::{KEYWORDS, is_keyword};
