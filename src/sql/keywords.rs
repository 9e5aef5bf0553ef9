//! SQL keyword table
//!
//! Keyword-level knowledge only; there is no grammar behind it.

/// Keywords offered as completion candidates, in suggestion order
pub const KEYWORDS: &[&str] = &[
    "SELECT",
    "FROM",
    "WHERE",
    "AND",
    "OR",
    "INSERT",
    "INTO",
    "UPDATE",
    "DELETE",
    "CREATE",
    "DROP",
    "ALTER",
    "TABLE",
    "INDEX",
    "JOIN",
    "INNER",
    "OUTER",
    "LEFT",
    "RIGHT",
    "CROSS",
    "ON",
    "NOT",
    "IN",
    "IS",
    "NULL",
    "LIKE",
    "ILIKE",
    "ORDER",
    "BY",
    "GROUP",
    "HAVING",
    "LIMIT",
    "OFFSET",
    "AS",
    "DISTINCT",
    "COUNT",
    "SUM",
    "AVG",
    "MIN",
    "MAX",
    "BETWEEN",
    "EXISTS",
    "CASE",
    "WHEN",
    "THEN",
    "ELSE",
    "END",
    "VALUES",
    "SET",
    "BEGIN",
    "COMMIT",
    "ROLLBACK",
    "UNION",
    "ALL",
    "ASC",
    "DESC",
    "PRIMARY",
    "KEY",
    "FOREIGN",
    "REFERENCES",
    "CASCADE",
    "RESTRICT",
    "DEFAULT",
    "RETURNING",
];

/// Literals the formatter uppercases but completion never suggests
const LITERALS: &[&str] = &["TRUE", "FALSE"];

/// Whether `word` is a reserved word (case-insensitive)
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS
        .iter()
        .chain(LITERALS)
        .any(|k| k.eq_ignore_ascii_case(word))
}

/// Tokens after which only table names make sense
pub fn expects_table(token: &str) -> bool {
    matches!(token, "FROM" | "JOIN" | "INTO" | "UPDATE" | "TABLE")
}
