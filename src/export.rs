//! Result set serialization (JSON / CSV / text)
//!
//! Pure functions, no filesystem I/O. The grid hands the returned strings to
//! the clipboard or to the worker, which writes them to disk.

use crate::db::types::{ResultSet, is_null};

/// Export format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// File extension for this format (without leading dot)
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Display label for status messages
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }
}

/// `pgpane_export_YYYYMMDD_HHMMSS.<ext>` in local time
pub fn export_filename(format: ExportFormat) -> String {
    let now = chrono::Local::now();
    format!(
        "pgpane_export_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Serialize a result set in the given format
pub fn export(results: &ResultSet, format: ExportFormat) -> String {
    match format {
        ExportFormat::Csv => to_csv(results),
        ExportFormat::Json => to_json(results),
    }
}

/// One row as a single-line JSON object with keys in column order.
///
/// Values stay strings; the `null` sentinel becomes JSON `null`.
pub fn row_to_json(columns: &[String], row: &[String]) -> String {
    let fields: Vec<String> = columns
        .iter()
        .zip(row)
        .map(|(col, val)| {
            let value = if is_null(val) {
                "null".to_string()
            } else {
                json_string(val)
            };
            format!("{}: {}", json_string(col), value)
        })
        .collect();
    format!("{{{}}}", fields.join(", "))
}

/// Array of row objects, one per line
pub fn to_json(results: &ResultSet) -> String {
    if results.rows.is_empty() {
        return "[]".to_string();
    }
    let rows: Vec<String> = results
        .rows
        .iter()
        .map(|row| format!("  {}", row_to_json(&results.columns, row)))
        .collect();
    format!("[\n{}\n]", rows.join(",\n"))
}

/// Header plus every row as RFC 4180 CSV
pub fn to_csv(results: &ResultSet) -> String {
    let mut out = String::new();
    write_csv_record(&mut out, &results.columns);
    for row in &results.rows {
        write_csv_record(&mut out, row);
    }
    out
}

/// Header plus one row as CSV
pub fn row_to_csv(columns: &[String], row: &[String]) -> String {
    let mut out = String::new();
    write_csv_record(&mut out, columns);
    write_csv_record(&mut out, row);
    out
}

/// Tab-separated values of one row
pub fn row_to_text(row: &[String]) -> String {
    row.join("\t")
}

fn json_string(s: &str) -> String {
    // Serializing a str cannot fail
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

fn write_csv_record(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        csv_escape_into(out, field);
    }
    out.push('\n');
}

/// Quote a field if it contains `,` `"` or a newline (RFC 4180).
fn csv_escape_into(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        for c in field.chars() {
            if c == '"' {
                out.push_str("\"\"");
            } else {
                out.push(c);
            }
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample_results() -> ResultSet {
        ResultSet::new(
            strings(&["id", "name"]),
            vec![strings(&["1", "Alice"]), strings(&["2", "null"])],
            Duration::from_millis(42),
        )
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
    }

    #[test]
    fn test_export_filename_shape() {
        let name = export_filename(ExportFormat::Json);
        assert!(name.starts_with("pgpane_export_"));
        assert!(name.ends_with(".json"));
        // pgpane_export_ + 8 digits + _ + 6 digits + .json
        assert_eq!(name.len(), "pgpane_export_".len() + 15 + ".json".len());
    }

    // ── JSON ─────────────────────────────────────────────────

    #[test]
    fn test_row_json_keeps_order_and_maps_null() {
        let columns = strings(&["id", "name"]);
        let row = strings(&["2", "null"]);
        assert_eq!(row_to_json(&columns, &row), r#"{"id": "2", "name": null}"#);
    }

    #[test]
    fn test_row_json_key_order_is_column_order() {
        let columns = strings(&["zeta", "alpha", "mid"]);
        let row = strings(&["1", "2", "3"]);
        assert_eq!(
            row_to_json(&columns, &row),
            r#"{"zeta": "1", "alpha": "2", "mid": "3"}"#
        );
    }

    #[test]
    fn test_row_json_escapes() {
        let columns = strings(&["note"]);
        let row = strings(&["say \"hi\"\nbye"]);
        assert_eq!(
            row_to_json(&columns, &row),
            r#"{"note": "say \"hi\"\nbye"}"#
        );
    }

    #[test]
    fn test_json_array_layout() {
        let json = to_json(&sample_results());
        assert_eq!(
            json,
            "[\n  {\"id\": \"1\", \"name\": \"Alice\"},\n  {\"id\": \"2\", \"name\": null}\n]"
        );
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed[1]["name"].is_null());
    }

    #[test]
    fn test_json_empty_results() {
        let results = ResultSet::new(strings(&["x"]), vec![], Duration::from_millis(1));
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&to_json(&results)).unwrap();
        assert!(parsed.is_empty());
    }

    // ── CSV ──────────────────────────────────────────────────

    #[test]
    fn test_basic_csv() {
        let csv = to_csv(&sample_results());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["id,name", "1,Alice", "2,null"]);
    }

    #[test]
    fn test_csv_escaping() {
        let results = ResultSet::new(
            strings(&["val"]),
            vec![
                strings(&["a,b"]),
                strings(&["say \"hi\""]),
                strings(&["line1\nline2"]),
            ],
            Duration::from_millis(1),
        );
        let csv = to_csv(&results);
        assert!(csv.contains("\"a,b\""));
        assert!(csv.contains("\"say \"\"hi\"\"\""));
        assert!(csv.contains("\"line1\nline2\""));
    }

    #[test]
    fn test_csv_empty_results() {
        let results = ResultSet::new(strings(&["a", "b"]), vec![], Duration::from_millis(1));
        assert_eq!(to_csv(&results), "a,b\n");
    }

    #[test]
    fn test_csv_header_needs_escaping() {
        let results = ResultSet::new(strings(&["col,name"]), vec![], Duration::from_millis(1));
        assert_eq!(to_csv(&results), "\"col,name\"\n");
    }

    #[test]
    fn test_row_csv_has_header() {
        let columns = strings(&["id", "name"]);
        let row = strings(&["2", "O'Neil, Pat"]);
        assert_eq!(row_to_csv(&columns, &row), "id,name\n2,\"O'Neil, Pat\"\n");
    }

    // ── text ─────────────────────────────────────────────────

    #[test]
    fn test_row_text_is_tab_joined() {
        assert_eq!(row_to_text(&strings(&["1", "Ann", "null"])), "1\tAnn\tnull");
    }

    #[test]
    fn test_export_dispatches_on_format() {
        let results = sample_results();
        assert_eq!(export(&results, ExportFormat::Csv), to_csv(&results));
        assert_eq!(export(&results, ExportFormat::Json), to_json(&results));
    }
}
