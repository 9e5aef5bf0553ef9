//! Terminal UI components
//!
//! All UI widgets and rendering logic using ratatui.

pub mod cell;
pub mod connect;
pub mod editor;
pub mod help;
pub mod layout;
pub mod render;
pub mod results;
pub mod theme;
pub mod tree;

use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::ui::theme::Theme;

/// Actions a component can return to signal intent to the parent.
/// Components never touch the clipboard, the filesystem or the database;
/// they declare what should happen and `App` carries it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentAction {
    /// Event consumed, no further action needed
    Consumed,
    /// Event not handled, parent should try
    Ignored,
    /// Replace the editor contents without running
    SetEditorQuery(String),
    /// Show an informational status line
    Status(String),
    /// Copy text; `label` is the status shown on success
    CopyToClipboard { text: String, label: String },
    /// Write an export file
    Export {
        filename: String,
        payload: String,
        rows: usize,
    },
}

/// Trait for UI components
pub trait Component {
    /// Handle a key event, returning an action for the parent to process.
    /// Panels driven entirely through the keymap keep the default.
    fn handle_key(&mut self, _key: KeyEvent) -> ComponentAction {
        ComponentAction::Ignored
    }

    /// Render the component to the frame
    fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme);
}
