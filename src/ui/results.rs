//! Query results grid
//!
//! A box-drawn table over a [`ResultSet`] with 2D virtual scrolling, a
//! single-record view and small prompt overlays for copying, exporting and
//! generating DELETE statements. Every side effect is returned as a
//! [`ComponentAction`]; the grid itself never touches the clipboard or disk.

use crate::db::types::{ResultSet, is_null};
use crate::export::{self, ExportFormat};
use crate::sql::generate;
use crate::ui::cell::{display_text, display_width, fit_cell, sanitize, truncate};
use crate::ui::theme::Theme;
use crate::ui::{Component, ComponentAction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::ops::Range;

/// Rows taken by summary, top border, header, separator, bottom border and footer
pub const CHROME_ROWS: usize = 6;
pub const MIN_COL_WIDTH: usize = 8;
pub const MAX_COL_WIDTH: usize = 40;
/// Longest cell value echoed back in the status line after a copy
const STATUS_PREVIEW: usize = 40;

/// Interaction mode; exactly one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Normal,
    RecordDetail,
    CopyRowPrompt,
    ExportPrompt,
    DeleteConfirm,
}

/// Clipboard formats for a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFormat {
    Json,
    Csv,
    Text,
}

impl RowFormat {
    fn label(&self) -> &'static str {
        match self {
            RowFormat::Json => "JSON",
            RowFormat::Csv => "CSV",
            RowFormat::Text => "text",
        }
    }
}

#[derive(Debug)]
pub struct ResultsGrid {
    result: Option<ResultSet>,
    error: Option<String>,
    loading: bool,
    /// SQL that produced `result`, used to guess the table for filters
    last_query: String,
    col_widths: Vec<usize>,
    cursor_row: usize,
    cursor_col: usize,
    scroll: usize,
    col_offset: usize,
    /// Drawable area inside the pane borders
    width: usize,
    height: usize,
    mode: ViewMode,
}

impl Default for ResultsGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsGrid {
    pub fn new() -> Self {
        Self {
            result: None,
            error: None,
            loading: false,
            last_query: String::new(),
            col_widths: Vec::new(),
            cursor_row: 0,
            cursor_col: 0,
            scroll: 0,
            col_offset: 0,
            width: 80,
            height: 20,
            mode: ViewMode::Normal,
        }
    }

    pub fn set_result(&mut self, result: ResultSet) {
        self.col_widths = column_widths(&result);
        self.result = Some(result);
        self.error = None;
        self.reset_view();
    }

    pub fn set_error(&mut self, error: String) {
        self.result = None;
        self.col_widths.clear();
        self.error = Some(error);
        self.reset_view();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_last_query(&mut self, sql: impl Into<String>) {
        self.last_query = sql.into();
    }

    /// Size of the drawable area inside the pane borders
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.width = usize::from(width);
        self.height = usize::from(height);
        self.ensure_row_visible();
        self.ensure_col_visible();
    }

    fn reset_view(&mut self) {
        self.loading = false;
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.scroll = 0;
        self.col_offset = 0;
        self.mode = ViewMode::Normal;
    }

    // ── accessors ────────────────────────────────────────────

    pub fn result(&self) -> Option<&ResultSet> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// (row, column) of the selected cell
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn col_offset(&self) -> usize {
        self.col_offset
    }

    pub fn column_widths(&self) -> &[usize] {
        &self.col_widths
    }

    fn row_count(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.rows.len())
    }

    fn col_count(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.columns.len())
    }

    fn current_row(&self) -> Option<&[String]> {
        self.result
            .as_ref()?
            .rows
            .get(self.cursor_row)
            .map(Vec::as_slice)
    }

    fn current_cell(&self) -> Option<(&str, &str)> {
        let result = self.result.as_ref()?;
        let column = result.columns.get(self.cursor_col)?;
        let value = result.cell(self.cursor_row, self.cursor_col)?;
        Some((column.as_str(), value))
    }

    // ── windowing ────────────────────────────────────────────

    /// Data rows that fit under the chrome, never less than one
    pub fn visible_rows(&self) -> usize {
        self.height.saturating_sub(CHROME_ROWS).max(1)
    }

    /// Columns packed left to right from `col_offset`, each costing its
    /// width plus padding and a border; the first always fits
    pub fn visible_columns(&self) -> Range<usize> {
        let start = self.col_offset.min(self.col_widths.len());
        let mut used = 1;
        let mut end = start;
        for (i, width) in self.col_widths.iter().enumerate().skip(start) {
            let cost = width + 3;
            if end > start && used + cost > self.width {
                break;
            }
            used += cost;
            end = i + 1;
        }
        start..end
    }

    fn ensure_row_visible(&mut self) {
        let rows = self.row_count();
        if rows == 0 {
            self.cursor_row = 0;
            self.scroll = 0;
            return;
        }
        self.cursor_row = self.cursor_row.min(rows - 1);
        let visible = self.visible_rows();
        if self.cursor_row < self.scroll {
            self.scroll = self.cursor_row;
        } else if self.cursor_row >= self.scroll + visible {
            self.scroll = self.cursor_row + 1 - visible;
        }
        self.scroll = self.scroll.min(rows.saturating_sub(visible));
    }

    fn ensure_col_visible(&mut self) {
        if self.cursor_col < self.col_offset {
            self.col_offset = self.cursor_col;
        }
        while self.col_offset < self.cursor_col && self.cursor_col >= self.visible_columns().end {
            self.col_offset += 1;
        }
    }

    // ── navigation ───────────────────────────────────────────

    pub fn move_up(&mut self) {
        self.cursor_row = self.cursor_row.saturating_sub(1);
        self.ensure_row_visible();
    }

    pub fn move_down(&mut self) {
        self.cursor_row += 1;
        self.ensure_row_visible();
    }

    pub fn page_up(&mut self) {
        self.cursor_row = self.cursor_row.saturating_sub(self.visible_rows());
        self.ensure_row_visible();
    }

    pub fn page_down(&mut self) {
        self.cursor_row += self.visible_rows();
        self.ensure_row_visible();
    }

    pub fn go_to_top(&mut self) {
        self.cursor_row = 0;
        self.ensure_row_visible();
    }

    pub fn go_to_bottom(&mut self) {
        self.cursor_row = self.row_count().saturating_sub(1);
        self.ensure_row_visible();
    }

    pub fn move_left(&mut self) {
        self.cursor_col = self.cursor_col.saturating_sub(1);
        self.ensure_col_visible();
    }

    pub fn move_right(&mut self) {
        self.cursor_col = (self.cursor_col + 1).min(self.col_count().saturating_sub(1));
        self.ensure_col_visible();
    }

    pub fn first_column(&mut self) {
        self.cursor_col = 0;
        self.ensure_col_visible();
    }

    pub fn last_column(&mut self) {
        self.cursor_col = self.col_count().saturating_sub(1);
        self.ensure_col_visible();
    }

    // ── actions ──────────────────────────────────────────────

    /// Copy the selected cell's raw value
    pub fn copy_cell(&self) -> ComponentAction {
        match self.current_cell() {
            Some((_, value)) if !sanitize(value).is_empty() && !is_null(value) => {
                ComponentAction::CopyToClipboard {
                    label: format!("Copied: {}", truncate(&sanitize(value), STATUS_PREVIEW)),
                    text: value.to_string(),
                }
            }
            _ => ComponentAction::Status("Nothing to copy".to_string()),
        }
    }

    pub fn copy_row(&self, format: RowFormat) -> ComponentAction {
        let (Some(result), Some(row)) = (self.result.as_ref(), self.current_row()) else {
            return ComponentAction::Status("No row to copy".to_string());
        };
        let text = match format {
            RowFormat::Json => export::row_to_json(&result.columns, row),
            RowFormat::Csv => export::row_to_csv(&result.columns, row),
            RowFormat::Text => export::row_to_text(row),
        };
        ComponentAction::CopyToClipboard {
            text,
            label: format!("Copied row as {}", format.label()),
        }
    }

    pub fn export(&self, format: ExportFormat) -> ComponentAction {
        let Some(result) = self.result.as_ref() else {
            return ComponentAction::Status("No results to export".to_string());
        };
        ComponentAction::Export {
            filename: export::export_filename(format),
            payload: export::export(result, format),
            rows: result.rows.len(),
        }
    }

    pub fn filter_by_value(&self) -> ComponentAction {
        match self.current_cell() {
            Some((column, value)) => ComponentAction::SetEditorQuery(generate::filter_by_value(
                &self.last_query,
                column,
                value,
            )),
            None => ComponentAction::Status("Cannot filter: no cell selected".to_string()),
        }
    }

    pub fn delete_statement(&self) -> ComponentAction {
        match (self.result.as_ref(), self.current_row()) {
            (Some(result), Some(row)) => ComponentAction::SetEditorQuery(generate::delete_row(
                &self.last_query,
                &result.columns,
                row,
            )),
            _ => ComponentAction::Status("No row selected".to_string()),
        }
    }

    // ── key handling per mode ────────────────────────────────

    fn handle_normal(&mut self, key: KeyEvent) -> ComponentAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::Left | KeyCode::Char('h') => self.move_left(),
            KeyCode::Right | KeyCode::Char('l') => self.move_right(),
            KeyCode::Home | KeyCode::Char('0') => self.first_column(),
            KeyCode::End | KeyCode::Char('$') => self.last_column(),
            KeyCode::Char('g') => self.go_to_top(),
            KeyCode::Char('G') => self.go_to_bottom(),
            KeyCode::Enter => {
                if self.current_row().is_some() {
                    self.mode = ViewMode::RecordDetail;
                }
            }
            _ => return self.handle_row_action(key),
        }
        ComponentAction::Consumed
    }

    fn handle_detail(&mut self, key: KeyEvent) -> ComponentAction {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.mode = ViewMode::Normal,
            KeyCode::Up | KeyCode::Char('k') => self.move_left(),
            KeyCode::Down | KeyCode::Char('j') => self.move_right(),
            KeyCode::Left | KeyCode::Char('h') => self.move_up(),
            KeyCode::Right | KeyCode::Char('l') => self.move_down(),
            _ => return self.handle_row_action(key),
        }
        ComponentAction::Consumed
    }

    /// Cell and row actions shared by the table and record views
    fn handle_row_action(&mut self, key: KeyEvent) -> ComponentAction {
        match key.code {
            KeyCode::Char('c') => self.copy_cell(),
            KeyCode::Char('f') => self.filter_by_value(),
            KeyCode::Char('y') => self.open_overlay(ViewMode::CopyRowPrompt, "No row to copy"),
            KeyCode::Char('D') => self.open_overlay(ViewMode::DeleteConfirm, "No row selected"),
            KeyCode::Char('e') => {
                if self.result.is_some() {
                    self.mode = ViewMode::ExportPrompt;
                    ComponentAction::Consumed
                } else {
                    ComponentAction::Status("No results to export".to_string())
                }
            }
            _ => ComponentAction::Ignored,
        }
    }

    fn open_overlay(&mut self, mode: ViewMode, no_row: &str) -> ComponentAction {
        if self.current_row().is_some() {
            self.mode = mode;
            ComponentAction::Consumed
        } else {
            ComponentAction::Status(no_row.to_string())
        }
    }

    fn handle_copy_prompt(&mut self, key: KeyEvent) -> ComponentAction {
        let format = match key.code {
            KeyCode::Char('j') => RowFormat::Json,
            KeyCode::Char('c') => RowFormat::Csv,
            KeyCode::Char('t') => RowFormat::Text,
            KeyCode::Esc => {
                self.mode = ViewMode::Normal;
                return ComponentAction::Consumed;
            }
            _ => return ComponentAction::Consumed,
        };
        self.mode = ViewMode::Normal;
        self.copy_row(format)
    }

    fn handle_export_prompt(&mut self, key: KeyEvent) -> ComponentAction {
        let format = match key.code {
            KeyCode::Char('j') => ExportFormat::Json,
            KeyCode::Char('c') => ExportFormat::Csv,
            KeyCode::Esc => {
                self.mode = ViewMode::Normal;
                return ComponentAction::Consumed;
            }
            _ => return ComponentAction::Consumed,
        };
        self.mode = ViewMode::Normal;
        self.export(format)
    }

    fn handle_delete_confirm(&mut self, key: KeyEvent) -> ComponentAction {
        match key.code {
            KeyCode::Char('y') => {
                self.mode = ViewMode::Normal;
                self.delete_statement()
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.mode = ViewMode::Normal;
                ComponentAction::Consumed
            }
            _ => ComponentAction::Consumed,
        }
    }

    // ── rendering ────────────────────────────────────────────

    fn summary(&self, result: &ResultSet) -> String {
        format!(
            "{} row(s) | {:.1}ms",
            result.row_count,
            result.execution_time.as_secs_f64() * 1000.0
        )
    }

    fn footer(&self, result: &ResultSet, cols: &Range<usize>) -> String {
        match self.mode {
            ViewMode::CopyRowPrompt => {
                return "Copy row as: [j]son  [c]sv  [t]ext   (Esc cancel)".to_string();
            }
            ViewMode::ExportPrompt => {
                return "Export results as: [j]son  [c]sv   (Esc cancel)".to_string();
            }
            ViewMode::DeleteConfirm => {
                return "Generate DELETE for this row? [y]es  [n]o".to_string();
            }
            ViewMode::Normal | ViewMode::RecordDetail => {}
        }

        let rows = result.rows.len();
        let (first, last) = if rows == 0 {
            (0, 0)
        } else {
            (self.scroll + 1, rows.min(self.scroll + self.visible_rows()))
        };
        let left = if cols.start > 0 { "← " } else { "" };
        let right = if cols.end < result.columns.len() { " →" } else { "" };
        format!(
            "{}Column {}-{} of {}{} | Row {}-{} of {} | Enter record  c copy  y row  e export  f filter  D delete",
            left,
            cols.start + 1,
            cols.end,
            result.columns.len(),
            right,
            first,
            last,
            rows
        )
    }

    fn table_lines(&self, result: &ResultSet, focused: bool, theme: &Theme) -> Vec<Line<'static>> {
        let cols = self.visible_columns();
        let widths = &self.col_widths[cols.clone()];
        let mut lines = Vec::with_capacity(self.visible_rows() + CHROME_ROWS);

        lines.push(Line::from(Span::styled(self.summary(result), theme.muted)));
        lines.push(Line::styled(border('┌', '┬', '┐', widths), theme.results_border));

        let mut header = vec![Span::styled("│", theme.results_border)];
        for col in cols.clone() {
            let text = format!(" {} ", fit_cell(&result.columns[col], self.col_widths[col]));
            header.push(Span::styled(text, theme.results_header));
            header.push(Span::styled("│", theme.results_border));
        }
        lines.push(Line::from(header));
        lines.push(Line::styled(border('├', '┼', '┤', widths), theme.results_border));

        let end = result.rows.len().min(self.scroll + self.visible_rows());
        for (i, row) in result.rows.iter().enumerate().take(end).skip(self.scroll) {
            let selected = i == self.cursor_row;
            let mut spans = vec![Span::styled("│", theme.results_border)];
            for col in cols.clone() {
                let value = row.get(col).map_or("", String::as_str);
                let text = format!(" {} ", fit_cell(value, self.col_widths[col]));
                let base = if is_null(value) || value.trim().is_empty() {
                    theme.results_null
                } else {
                    theme.results_cell
                };
                let style = if selected && focused && col == self.cursor_col {
                    theme.results_selected_cell
                } else if selected {
                    base.patch(theme.results_selected_row)
                } else {
                    base
                };
                spans.push(Span::styled(text, style));
                spans.push(Span::styled("│", theme.results_border));
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::styled(border('└', '┴', '┘', widths), theme.results_border));
        let footer_style = if self.mode == ViewMode::Normal {
            theme.muted
        } else {
            theme.prompt
        };
        lines.push(Line::from(Span::styled(self.footer(result, &cols), footer_style)));
        lines
    }

    fn detail_lines(&self, result: &ResultSet, height: usize, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            format!("Record {} of {}", self.cursor_row + 1, result.rows.len()),
            theme.results_header,
        ))];
        let Some(row) = self.current_row() else {
            return lines;
        };

        let label_width = result
            .columns
            .iter()
            .map(|c| display_width(c))
            .max()
            .unwrap_or(0)
            .min(MAX_COL_WIDTH);
        let value_width = self.width.saturating_sub(label_width + 3);
        let fields = height.saturating_sub(2).max(1);
        let offset = self.cursor_col.saturating_sub(fields - 1);

        for (i, column) in result.columns.iter().enumerate().skip(offset).take(fields) {
            let value = row.get(i).map_or("", String::as_str);
            let label = fit_cell(column, label_width);
            let shown = truncate(&display_text(value), value_width).into_owned();
            let value_style = if is_null(value) {
                theme.results_null
            } else {
                theme.results_cell
            };
            let (label_style, value_style) = if i == self.cursor_col {
                (theme.results_selected_cell, value_style.patch(theme.results_selected_row))
            } else {
                (theme.results_header, value_style)
            };
            lines.push(Line::from(vec![
                Span::styled(label, label_style),
                Span::styled(" │ ", theme.results_border),
                Span::styled(shown, value_style),
            ]));
        }

        lines.push(Line::from(Span::styled(
            "Esc back | ↑↓ fields | ←→ records | c copy  y row  e export  f filter  D delete",
            theme.prompt,
        )));
        lines
    }
}

impl Component for ResultsGrid {
    fn handle_key(&mut self, key: KeyEvent) -> ComponentAction {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return ComponentAction::Ignored;
        }
        match self.mode {
            ViewMode::Normal => self.handle_normal(key),
            ViewMode::RecordDetail => self.handle_detail(key),
            ViewMode::CopyRowPrompt => self.handle_copy_prompt(key),
            ViewMode::ExportPrompt => self.handle_export_prompt(key),
            ViewMode::DeleteConfirm => self.handle_delete_confirm(key),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Results ")
            .border_style(theme.border_style(focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.loading {
            let p = Paragraph::new(Span::styled("Executing query...", theme.muted));
            frame.render_widget(p, inner);
            return;
        }
        if let Some(error) = &self.error {
            let lines = vec![
                Line::from(Span::styled("Query Error", theme.results_error_title)),
                Line::from(""),
                Line::from(Span::styled(error.as_str(), theme.results_error_text)),
            ];
            let p = Paragraph::new(lines).wrap(Wrap { trim: false });
            frame.render_widget(p, inner);
            return;
        }
        let Some(result) = &self.result else {
            let p = Paragraph::new(Span::styled("Execute a query to see results", theme.muted));
            frame.render_widget(p, inner);
            return;
        };
        if result.columns.is_empty() {
            let lines = vec![
                Line::from(Span::styled(self.summary(result), theme.muted)),
                Line::from(Span::styled("Query executed successfully", theme.status_success)),
            ];
            frame.render_widget(Paragraph::new(lines), inner);
            return;
        }

        let lines = if self.mode == ViewMode::RecordDetail {
            self.detail_lines(result, usize::from(inner.height), theme)
        } else {
            self.table_lines(result, focused, theme)
        };
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// Column widths: widest of header and sanitized cells, clamped
fn column_widths(result: &ResultSet) -> Vec<usize> {
    result
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let widest = result
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|v| display_width(&sanitize(v)))
                .max()
                .unwrap_or(0);
            display_width(name)
                .max(widest)
                .clamp(MIN_COL_WIDTH, MAX_COL_WIDTH)
        })
        .collect()
}

/// Horizontal rule with the given corner and junction glyphs
fn border(left: char, mid: char, right: char, widths: &[usize]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}", left, segments.join(&mid.to_string()), right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn code(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn users() -> ResultSet {
        ResultSet::new(
            strings(&["id", "name", "email"]),
            vec![
                strings(&["1", "Ann", "a'b"]),
                strings(&["2", "null", "bob@example.com"]),
            ],
            Duration::from_millis(3),
        )
    }

    fn grid_with(result: ResultSet) -> ResultsGrid {
        let mut grid = ResultsGrid::new();
        grid.set_last_query("SELECT * FROM users");
        grid.set_result(result);
        grid
    }

    /// `rows` rows of `cols` columns, every cell `width` chars wide
    fn wide(rows: usize, cols: usize, width: usize) -> ResultSet {
        let columns = (0..cols).map(|c| format!("c{}", c)).collect();
        let data = (0..rows).map(|_| vec!["x".repeat(width); cols]).collect();
        ResultSet::new(columns, data, Duration::ZERO)
    }

    // ── widths ───────────────────────────────────────────────

    #[test]
    fn test_column_widths_clamped() {
        let result = ResultSet::new(
            strings(&["id", "body", "title"]),
            vec![strings(&["1", &"y".repeat(100), "名前名前名前"])],
            Duration::ZERO,
        );
        let grid = grid_with(result);
        assert_eq!(grid.column_widths(), &[8, 40, 12]);
    }

    #[test]
    fn test_column_width_ignores_newlines() {
        let result = ResultSet::new(
            strings(&["note"]),
            vec![strings(&["  short\nlines here  "])],
            Duration::ZERO,
        );
        let grid = grid_with(result);
        assert_eq!(grid.column_widths(), &["short lines here".len()]);
    }

    // ── vertical windowing ───────────────────────────────────

    #[test]
    fn test_visible_rows_never_below_one() {
        let mut grid = ResultsGrid::new();
        grid.set_viewport(80, 3);
        assert_eq!(grid.visible_rows(), 1);
        grid.set_viewport(80, 16);
        assert_eq!(grid.visible_rows(), 10);
    }

    #[test]
    fn test_scroll_stays_in_bounds() {
        for height in [1u16, 6, 7, 10, 25] {
            let mut grid = grid_with(wide(30, 2, 4));
            grid.set_viewport(80, height);
            let visible = grid.visible_rows();
            let max_scroll = 30usize.saturating_sub(visible);
            let moves: Vec<fn(&mut ResultsGrid)> = vec![
                ResultsGrid::move_down,
                ResultsGrid::page_down,
                ResultsGrid::page_down,
                ResultsGrid::move_up,
                ResultsGrid::go_to_bottom,
                ResultsGrid::page_up,
                ResultsGrid::move_down,
                ResultsGrid::go_to_top,
            ];
            for step in moves {
                step(&mut grid);
                let (row, _) = grid.cursor();
                assert!(grid.scroll() <= max_scroll);
                assert!(row >= grid.scroll() && row < grid.scroll() + visible);
            }
        }
    }

    #[test]
    fn test_scroll_moves_minimally() {
        let mut grid = grid_with(wide(50, 1, 4));
        grid.set_viewport(80, 11); // 5 rows
        for _ in 0..5 {
            grid.move_down();
        }
        assert_eq!(grid.cursor().0, 5);
        assert_eq!(grid.scroll(), 1);
        grid.move_up();
        assert_eq!(grid.scroll(), 1);
        grid.go_to_bottom();
        assert_eq!(grid.scroll(), 45);
    }

    #[test]
    fn test_navigation_clamps() {
        let mut grid = grid_with(users());
        grid.move_up();
        grid.move_left();
        assert_eq!(grid.cursor(), (0, 0));
        grid.page_down();
        grid.last_column();
        grid.move_right();
        assert_eq!(grid.cursor(), (1, 2));
    }

    // ── horizontal packing ───────────────────────────────────

    #[test]
    fn test_packing_fits_pane_width() {
        for width in [10u16, 20, 23, 34, 60, 120] {
            let mut grid = grid_with(wide(3, 8, 10));
            grid.set_viewport(width, 20);
            for _ in 0..8 {
                let cols = grid.visible_columns();
                assert!(!cols.is_empty());
                let used: usize = 1 + grid.column_widths()[cols.clone()]
                    .iter()
                    .map(|w| w + 3)
                    .sum::<usize>();
                assert!(cols.len() == 1 || used <= usize::from(width));
                let (_, col) = grid.cursor();
                assert!(cols.contains(&col));
                grid.move_right();
            }
        }
    }

    #[test]
    fn test_narrow_pane_shows_one_column() {
        let mut grid = grid_with(wide(1, 3, 30));
        grid.set_viewport(10, 20);
        assert_eq!(grid.visible_columns(), 0..1);
    }

    #[test]
    fn test_col_offset_moves_minimally() {
        // Each column costs 13; 1 + 3 * 13 = 40
        let mut grid = grid_with(wide(1, 6, 10));
        grid.set_viewport(40, 20);
        assert_eq!(grid.visible_columns(), 0..3);
        grid.move_right();
        grid.move_right();
        assert_eq!(grid.col_offset(), 0);
        grid.move_right();
        assert_eq!(grid.col_offset(), 1);
        assert_eq!(grid.visible_columns(), 1..4);
        grid.move_left();
        grid.move_left();
        assert_eq!(grid.col_offset(), 1);
        grid.move_left();
        assert_eq!(grid.col_offset(), 0);
        grid.last_column();
        assert_eq!(grid.visible_columns(), 3..6);
        grid.first_column();
        assert_eq!(grid.col_offset(), 0);
    }

    // ── modes ────────────────────────────────────────────────

    #[test]
    fn test_new_result_resets_state() {
        let mut grid = grid_with(users());
        grid.move_down();
        grid.move_right();
        grid.handle_key(key('y'));
        assert_eq!(grid.mode(), ViewMode::CopyRowPrompt);
        grid.set_result(users());
        assert_eq!(grid.mode(), ViewMode::Normal);
        assert_eq!(grid.cursor(), (0, 0));
        assert_eq!(grid.scroll(), 0);
    }

    #[test]
    fn test_error_resets_to_normal() {
        let mut grid = grid_with(users());
        grid.handle_key(code(KeyCode::Enter));
        grid.set_error("relation does not exist".to_string());
        assert_eq!(grid.mode(), ViewMode::Normal);
        assert!(grid.result().is_none());
        assert_eq!(grid.error(), Some("relation does not exist"));
    }

    #[test]
    fn test_enter_opens_record_detail() {
        let mut grid = grid_with(users());
        assert_eq!(grid.handle_key(code(KeyCode::Enter)), ComponentAction::Consumed);
        assert_eq!(grid.mode(), ViewMode::RecordDetail);
        // Right moves to the next record, Down to the next field
        grid.handle_key(key('l'));
        grid.handle_key(key('j'));
        assert_eq!(grid.cursor(), (1, 1));
        grid.handle_key(code(KeyCode::Esc));
        assert_eq!(grid.mode(), ViewMode::Normal);
    }

    #[test]
    fn test_overlays_escape_to_normal() {
        let mut grid = grid_with(users());
        for open in ['y', 'e', 'D'] {
            grid.handle_key(key(open));
            assert_ne!(grid.mode(), ViewMode::Normal);
            assert_eq!(grid.handle_key(code(KeyCode::Esc)), ComponentAction::Consumed);
            assert_eq!(grid.mode(), ViewMode::Normal);
        }
    }

    #[test]
    fn test_prompt_swallows_unrelated_keys() {
        let mut grid = grid_with(users());
        grid.handle_key(key('y'));
        assert_eq!(grid.handle_key(key('x')), ComponentAction::Consumed);
        assert_eq!(grid.mode(), ViewMode::CopyRowPrompt);
    }

    #[test]
    fn test_control_chords_ignored() {
        let mut grid = grid_with(users());
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(grid.handle_key(ctrl_c), ComponentAction::Ignored);
    }

    // ── row and cell actions ─────────────────────────────────

    #[test]
    fn test_copy_row_as_json() {
        let mut grid = ResultsGrid::new();
        grid.set_result(ResultSet::new(
            strings(&["id", "name"]),
            vec![strings(&["1", "Ann"]), strings(&["2", "null"])],
            Duration::ZERO,
        ));
        grid.handle_key(key('j'));
        grid.handle_key(key('y'));
        let action = grid.handle_key(key('j'));
        assert_eq!(
            action,
            ComponentAction::CopyToClipboard {
                text: r#"{"id": "2", "name": null}"#.to_string(),
                label: "Copied row as JSON".to_string(),
            }
        );
        assert_eq!(grid.mode(), ViewMode::Normal);
    }

    #[test]
    fn test_copy_row_as_csv_and_text() {
        let mut grid = grid_with(users());
        grid.handle_key(key('y'));
        let ComponentAction::CopyToClipboard { text, label } = grid.handle_key(key('c')) else {
            panic!("expected copy");
        };
        assert_eq!(text, "id,name,email\n1,Ann,a'b\n");
        assert_eq!(label, "Copied row as CSV");

        grid.handle_key(key('y'));
        let ComponentAction::CopyToClipboard { text, .. } = grid.handle_key(key('t')) else {
            panic!("expected copy");
        };
        assert_eq!(text, "1\tAnn\ta'b");
    }

    #[test]
    fn test_copy_row_without_rows() {
        let mut grid = grid_with(ResultSet::new(strings(&["id"]), vec![], Duration::ZERO));
        assert_eq!(
            grid.handle_key(key('y')),
            ComponentAction::Status("No row to copy".to_string())
        );
        assert_eq!(grid.mode(), ViewMode::Normal);
    }

    #[test]
    fn test_copy_cell() {
        let mut grid = grid_with(users());
        grid.move_right();
        assert_eq!(
            grid.handle_key(key('c')),
            ComponentAction::CopyToClipboard {
                text: "Ann".to_string(),
                label: "Copied: Ann".to_string(),
            }
        );
        grid.move_down();
        assert_eq!(
            grid.handle_key(key('c')),
            ComponentAction::Status("Nothing to copy".to_string())
        );
    }

    #[test]
    fn test_copy_cell_whitespace_only_is_nothing() {
        let mut grid = grid_with(ResultSet::new(
            strings(&["note"]),
            vec![vec![" \n\t ".to_string()]],
            Duration::ZERO,
        ));
        assert_eq!(
            grid.handle_key(key('c')),
            ComponentAction::Status("Nothing to copy".to_string())
        );
    }

    #[test]
    fn test_copy_cell_truncates_status() {
        let long = "z".repeat(60);
        let mut grid = grid_with(ResultSet::new(
            strings(&["blob"]),
            vec![vec![long.clone()]],
            Duration::ZERO,
        ));
        let ComponentAction::CopyToClipboard { text, label } = grid.handle_key(key('c')) else {
            panic!("expected copy");
        };
        assert_eq!(text, long);
        assert_eq!(label, format!("Copied: {}...", "z".repeat(37)));
    }

    #[test]
    fn test_filter_by_value_escapes() {
        let mut grid = grid_with(users());
        grid.last_column();
        assert_eq!(
            grid.handle_key(key('f')),
            ComponentAction::SetEditorQuery(
                "SELECT * FROM users WHERE email = 'a''b'".to_string()
            )
        );
    }

    #[test]
    fn test_filter_by_null() {
        let mut grid = grid_with(users());
        grid.move_down();
        grid.move_right();
        assert_eq!(
            grid.handle_key(key('f')),
            ComponentAction::SetEditorQuery("SELECT * FROM users WHERE name IS NULL".to_string())
        );
    }

    #[test]
    fn test_filter_without_cell() {
        let mut grid = ResultsGrid::new();
        assert_eq!(
            grid.handle_key(key('f')),
            ComponentAction::Status("Cannot filter: no cell selected".to_string())
        );
    }

    #[test]
    fn test_delete_confirm_generates_statement() {
        let mut grid = grid_with(users());
        grid.move_down();
        grid.handle_key(key('D'));
        assert_eq!(grid.mode(), ViewMode::DeleteConfirm);
        assert_eq!(
            grid.handle_key(key('y')),
            ComponentAction::SetEditorQuery(
                "-- review before executing!\nDELETE FROM users WHERE id = '2' AND name IS NULL AND email = 'bob@example.com'"
                    .to_string()
            )
        );
        assert_eq!(grid.mode(), ViewMode::Normal);
    }

    #[test]
    fn test_delete_declined() {
        let mut grid = grid_with(users());
        grid.handle_key(key('D'));
        assert_eq!(grid.handle_key(key('n')), ComponentAction::Consumed);
        assert_eq!(grid.mode(), ViewMode::Normal);
    }

    #[test]
    fn test_export_emits_payload() {
        let mut grid = grid_with(users());
        grid.handle_key(key('e'));
        let ComponentAction::Export {
            filename,
            payload,
            rows,
        } = grid.handle_key(key('c'))
        else {
            panic!("expected export");
        };
        assert!(filename.starts_with("pgpane_export_"));
        assert!(filename.ends_with(".csv"));
        assert_eq!(rows, 2);
        assert!(payload.starts_with("id,name,email\n"));
    }

    #[test]
    fn test_export_without_results() {
        let mut grid = ResultsGrid::new();
        assert_eq!(
            grid.handle_key(key('e')),
            ComponentAction::Status("No results to export".to_string())
        );
    }

    #[test]
    fn test_actions_available_in_record_detail() {
        let mut grid = grid_with(users());
        grid.handle_key(code(KeyCode::Enter));
        grid.handle_key(key('y'));
        assert_eq!(grid.mode(), ViewMode::CopyRowPrompt);
        grid.handle_key(code(KeyCode::Esc));
        assert_eq!(grid.mode(), ViewMode::Normal);
    }

    // ── rendering helpers ────────────────────────────────────

    #[test]
    fn test_border_glyphs() {
        assert_eq!(border('┌', '┬', '┐', &[1, 2]), "┌───┬────┐");
        assert_eq!(border('└', '┴', '┘', &[]), "└┘");
    }

    #[test]
    fn test_footer_reports_window() {
        let mut grid = grid_with(wide(30, 6, 10));
        grid.set_viewport(40, 16);
        let result = grid.result().unwrap().clone();
        let footer = grid.footer(&result, &grid.visible_columns());
        assert!(footer.starts_with("Column 1-3 of 6 →"));
        assert!(footer.contains("Row 1-10 of 30"));
    }
}
