//! Database type definitions
//!
//! Result sets arrive fully stringified: every cell is display text and SQL
//! NULL is carried as the [`NULL`] sentinel.

use std::time::Duration;

/// Sentinel text for SQL NULL
pub const NULL: &str = "null";

/// Query execution results
///
/// Immutable once handed to the results grid; a new query replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// Column names in projection order
    pub columns: Vec<String>,
    /// Rows aligned positionally to `columns`
    pub rows: Vec<Vec<String>>,
    /// Number of rows returned
    pub row_count: usize,
    /// Query execution time
    pub execution_time: Duration,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>, execution_time: Duration) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            row_count,
            execution_time,
        }
    }

    /// Cell text at (row, col), if both are in range
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Whether a cell holds the NULL sentinel
pub fn is_null(value: &str) -> bool {
    value == NULL
}

/// Column metadata for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    /// Type name as reported by the server (e.g. `integer`, `character varying`)
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    /// 1-based position within the table
    pub ordinal: i32,
    pub is_primary_key: bool,
}
