//! SQL query editor
//!
//! A plain text buffer with a byte-offset cursor. Typing a space, newline or
//! `;` uppercases the keyword just finished. The completion dropdown is
//! owned by `App`; the editor only knows how to draw it under its cursor.

use crate::completer::CompletionState;
use crate::sql::formatter::{format_keywords, is_trigger, uppercase_word_before};
use crate::ui::cell::display_width;
use crate::ui::theme::Theme;
use crate::ui::{Component, ComponentAction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};

const PLACEHOLDER: &str = "Type SQL here. F5 or Ctrl+E runs it.";

/// Multi-line SQL buffer
#[derive(Debug, Default, Clone)]
pub struct QueryEditor {
    content: String,
    /// Byte offset into `content`, always on a char boundary
    cursor: usize,
}

impl QueryEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Replace the buffer and put the cursor at the end
    pub fn set_content(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.cursor = self.content.len();
    }

    /// Replace the buffer with an explicit cursor, as after a completion splice
    pub fn replace(&mut self, text: String, cursor: usize) {
        self.content = text;
        self.cursor = if self.content.is_char_boundary(cursor) {
            cursor
        } else {
            self.content.len()
        };
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Uppercase all keywords outside string literals; the cursor keeps its
    /// byte offset because keywords are ASCII
    pub fn format(&mut self) {
        let cursor = self.cursor;
        let formatted = format_keywords(&self.content);
        self.replace(formatted, cursor);
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        if is_trigger(c) {
            uppercase_word_before(&mut self.content, self.cursor);
        }
    }

    /// Insert text verbatim (paste); no auto-uppercase
    pub fn insert_text(&mut self, text: &str) {
        self.content.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    pub fn newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.content.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.content.replace_range(self.cursor..next, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = self.line_start(self.cursor);
    }

    pub fn move_end(&mut self) {
        self.cursor = self.line_end(self.cursor);
    }

    pub fn move_up(&mut self) {
        let start = self.line_start(self.cursor);
        if start == 0 {
            return;
        }
        let col = self.content[start..self.cursor].chars().count();
        let prev_end = start - 1;
        let prev_start = self.line_start(prev_end);
        self.cursor = self.offset_in_line(prev_start, prev_end, col);
    }

    pub fn move_down(&mut self) {
        let end = self.line_end(self.cursor);
        if end == self.content.len() {
            return;
        }
        let start = self.line_start(self.cursor);
        let col = self.content[start..self.cursor].chars().count();
        let next_start = end + 1;
        let next_end = self.line_end(next_start);
        self.cursor = self.offset_in_line(next_start, next_end, col);
    }

    /// Zero-based line and display column of the cursor
    pub fn line_col(&self) -> (usize, usize) {
        let before = &self.content[..self.cursor];
        let line = before.matches('\n').count();
        let start = self.line_start(self.cursor);
        (line, display_width(&self.content[start..self.cursor]))
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.cursor]
            .chars()
            .next_back()
            .map(|c| self.cursor - c.len_utf8())
    }

    fn next_boundary(&self) -> Option<usize> {
        self.content[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    fn line_start(&self, pos: usize) -> usize {
        self.content[..pos].rfind('\n').map_or(0, |i| i + 1)
    }

    fn line_end(&self, pos: usize) -> usize {
        self.content[pos..]
            .find('\n')
            .map_or(self.content.len(), |i| pos + i)
    }

    /// Byte offset of char column `col` in `[start, end)`, clamped to `end`
    fn offset_in_line(&self, start: usize, end: usize, col: usize) -> usize {
        self.content[start..end]
            .char_indices()
            .nth(col)
            .map_or(end, |(i, _)| start + i)
    }

    /// Scroll offsets that keep the cursor inside `inner`
    fn viewport(&self, inner: Rect) -> (usize, usize) {
        let (line, col) = self.line_col();
        let height = usize::from(inner.height.max(1));
        let width = usize::from(inner.width.max(1));
        (
            line.saturating_sub(height - 1),
            col.saturating_sub(width - 1),
        )
    }

    fn inner_area(area: Rect) -> Rect {
        Block::default().borders(Borders::ALL).inner(area)
    }

    /// Screen position of the cursor when the editor is drawn in `area`
    pub fn cursor_position(&self, area: Rect) -> Position {
        let inner = Self::inner_area(area);
        let (v, h) = self.viewport(inner);
        let (line, col) = self.line_col();
        let x = inner.x + u16::try_from(col - h).unwrap_or(inner.width);
        let y = inner.y + u16::try_from(line - v).unwrap_or(inner.height);
        Position::new(
            x.min(inner.right().saturating_sub(1)),
            y.min(inner.bottom().saturating_sub(1)),
        )
    }

    /// Draw the completion dropdown below the cursor, or above it when the
    /// pane has no room underneath
    pub fn render_completions(
        &self,
        frame: &mut Frame,
        area: Rect,
        state: &CompletionState,
        theme: &Theme,
    ) {
        let anchor = self.cursor_position(area);
        let widest = state
            .candidates
            .iter()
            .map(|c| display_width(c))
            .max()
            .unwrap_or(0);
        let width = u16::try_from(widest + 2)
            .unwrap_or(u16::MAX)
            .min(area.width);
        let height = u16::try_from(state.candidates.len())
            .unwrap_or(u16::MAX)
            .min(area.height.saturating_sub(2).max(1));

        let below = anchor.y + 1;
        let y = if below + height <= area.bottom() {
            below
        } else {
            anchor.y.saturating_sub(height).max(area.y)
        };
        let x = anchor.x.min(area.right().saturating_sub(width));
        let popup = Rect::new(x, y, width, height);

        let items: Vec<ListItem> = state
            .candidates
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let style = if i == state.selected {
                    theme.completion_selected
                } else {
                    theme.completion_item
                };
                ListItem::new(format!(" {} ", c)).style(style)
            })
            .collect();

        frame.render_widget(Clear, popup);
        frame.render_widget(List::new(items), popup);
    }
}

impl Component for QueryEditor {
    fn handle_key(&mut self, key: KeyEvent) -> ComponentAction {
        let chord = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match key.code {
            KeyCode::Char(c) if !chord => self.insert_char(c),
            KeyCode::Enter => self.newline(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            _ => return ComponentAction::Ignored,
        }
        ComponentAction::Consumed
    }

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Query ")
            .border_style(theme.border_style(focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.content.is_empty() {
            let hint = Paragraph::new(Span::styled(PLACEHOLDER, theme.editor_placeholder));
            frame.render_widget(hint, inner);
        } else {
            let (v, h) = self.viewport(inner);
            let lines: Vec<Line> = self
                .content
                .split('\n')
                .map(|l| Line::from(Span::styled(l, theme.editor_text)))
                .collect();
            let scroll = (
                u16::try_from(v).unwrap_or(u16::MAX),
                u16::try_from(h).unwrap_or(u16::MAX),
            );
            frame.render_widget(Paragraph::new(lines).scroll(scroll), inner);
        }

        if focused {
            frame.set_cursor_position(self.cursor_position(area));
        }
    }
}
