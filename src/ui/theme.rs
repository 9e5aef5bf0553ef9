//! UI theme and styling
//!
//! Colors and styles shared by every pane.

use crate::app::StatusLevel;
use ratatui::style::{Color, Modifier, Style};

/// Application theme
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_focused: Style,
    pub border_unfocused: Style,
    pub title: Style,

    // Schema tree
    pub tree_database: Style,
    pub tree_schema: Style,
    pub tree_table: Style,
    pub tree_column: Style,
    pub tree_primary_key: Style,
    pub tree_selected: Style,

    // Query editor
    pub editor_text: Style,
    pub editor_placeholder: Style,
    pub completion_item: Style,
    pub completion_selected: Style,

    // Results grid
    pub results_border: Style,
    pub results_header: Style,
    pub results_cell: Style,
    pub results_selected_row: Style,
    pub results_selected_cell: Style,
    pub results_null: Style,
    pub results_error_title: Style,
    pub results_error_text: Style,
    pub prompt: Style,

    // Help overlay
    pub help_section: Style,
    pub help_key: Style,
    pub help_desc: Style,

    // Shared
    pub muted: Style,
    pub key_hint: Style,

    // Status messages
    pub status_success: Style,
    pub status_error: Style,
    pub status_info: Style,
    pub status_warning: Style,
    pub status_connected: Style,
    pub status_disconnected: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border_focused: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            border_unfocused: Style::default().fg(Color::DarkGray),
            title: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            tree_database: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            tree_schema: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            tree_table: Style::default().fg(Color::Green),
            tree_column: Style::default().fg(Color::Gray),
            tree_primary_key: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            tree_selected: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),

            editor_text: Style::default().fg(Color::White),
            editor_placeholder: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            completion_item: Style::default().fg(Color::White).bg(Color::DarkGray),
            completion_selected: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),

            results_border: Style::default().fg(Color::DarkGray),
            results_header: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            results_cell: Style::default().fg(Color::White),
            results_selected_row: Style::default().bg(Color::Rgb(40, 40, 60)),
            results_selected_cell: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow),
            results_null: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            results_error_title: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            results_error_text: Style::default().fg(Color::Red),
            prompt: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            help_section: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(Color::Cyan),
            help_desc: Style::default().fg(Color::White),

            muted: Style::default().fg(Color::DarkGray),
            key_hint: Style::default().fg(Color::Cyan),

            status_success: Style::default().fg(Color::Green),
            status_error: Style::default().fg(Color::Red),
            status_info: Style::default().fg(Color::Blue),
            status_warning: Style::default().fg(Color::Yellow),
            status_connected: Style::default().fg(Color::Green),
            status_disconnected: Style::default().fg(Color::Red),
        }
    }
}

impl Theme {
    /// Create a new theme with default colors
    pub fn new() -> Self {
        Self::default()
    }

    /// Get border style based on focus
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            self.border_focused
        } else {
            self.border_unfocused
        }
    }

    /// Style for a status message of the given level
    pub fn status_style(&self, level: StatusLevel) -> Style {
        match level {
            StatusLevel::Info => self.status_info,
            StatusLevel::Success => self.status_success,
            StatusLevel::Warning => self.status_warning,
            StatusLevel::Error => self.status_error,
        }
    }
}
