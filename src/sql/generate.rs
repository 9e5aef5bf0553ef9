//! Statement builders
//!
//! Text-only SQL generation for the results grid and the schema browser.
//! Nothing here executes anything; callers hand the text to the editor.

use crate::db::types::is_null;

/// Placeholder used when no table can be found in the last query
pub const UNKNOWN_TABLE: &str = "<table>";

/// Best-effort table name from a query.
///
/// Scans whitespace tokens for FROM, INTO or UPDATE and returns the next
/// token with trailing `;,()` trimmed. Joins and subqueries are not
/// understood; the first match wins and [`UNKNOWN_TABLE`] is the fallback.
pub fn extract_table_name(query: &str) -> String {
    let tokens: Vec<&str> = query.split_whitespace().collect();
    tokens
        .windows(2)
        .filter(|pair| {
            let kw = pair[0].to_ascii_uppercase();
            kw == "FROM" || kw == "INTO" || kw == "UPDATE"
        })
        .map(|pair| pair[1].trim_end_matches([';', ',', '(', ')']))
        .find(|name| !name.is_empty())
        .map_or_else(|| UNKNOWN_TABLE.to_string(), str::to_string)
}

/// Escape a value for a single-quoted SQL literal
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote an identifier, doubling embedded double quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Equality predicate for one column, or `IS NULL` for the sentinel
pub fn predicate(column: &str, value: &str) -> String {
    if is_null(value) {
        format!("{} IS NULL", column)
    } else {
        format!("{} = {}", column, quote_literal(value))
    }
}

/// `SELECT * FROM <table> WHERE <col> = '<value>'`
pub fn filter_by_value(last_query: &str, column: &str, value: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE {}",
        extract_table_name(last_query),
        predicate(column, value)
    )
}

/// DELETE matching every column of one row, prefixed with a review comment
pub fn delete_row(last_query: &str, columns: &[String], row: &[String]) -> String {
    let conditions: Vec<String> = columns
        .iter()
        .zip(row)
        .map(|(col, val)| predicate(col, val))
        .collect();
    format!(
        "-- review before executing!\nDELETE FROM {} WHERE {}",
        extract_table_name(last_query),
        conditions.join(" AND ")
    )
}

/// First 100 rows of a table
pub fn preview_query(schema: &str, table: &str) -> String {
    format!(
        "SELECT * FROM {}.{} LIMIT 100",
        quote_ident(schema),
        quote_ident(table)
    )
}

/// Exact row count of a table
pub fn count_query(schema: &str, table: &str) -> String {
    format!(
        "SELECT COUNT(*) FROM {}.{}",
        quote_ident(schema),
        quote_ident(table)
    )
}
