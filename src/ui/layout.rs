//! Panel layout management
//!
//! Explorer on the left, editor over results on the right, one status row
//! along the bottom.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const MIN_EXPLORER_WIDTH: u16 = 22;
pub const MAX_EXPLORER_WIDTH: u16 = 35;
pub const MIN_EDITOR_HEIGHT: u16 = 5;

/// Screen regions of the main view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainLayout {
    pub explorer: Rect,
    pub editor: Rect,
    pub results: Rect,
    pub status: Rect,
}

/// Explorer takes a quarter of the width within fixed bounds; the editor
/// takes 40% of the right column
pub fn calculate_layout(area: Rect) -> MainLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let (body, status) = (rows[0], rows[1]);

    let explorer_width = (body.width / 4).clamp(MIN_EXPLORER_WIDTH, MAX_EXPLORER_WIDTH);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(explorer_width), Constraint::Min(0)])
        .split(body);

    let editor_height = (columns[1].height * 2 / 5).max(MIN_EDITOR_HEIGHT);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(editor_height), Constraint::Min(0)])
        .split(columns[1]);

    MainLayout {
        explorer: columns[0],
        editor: right[0],
        results: right[1],
        status,
    }
}

/// Centered rectangle of at most `width` × `height`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
