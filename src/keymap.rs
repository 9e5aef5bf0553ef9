//! Data-driven keybinding configuration
//!
//! Bindings live as data in `KeyMap::default()`. A binding resolves to a
//! `KeyAction`, which `App::execute_key_action()` carries out. The results
//! grid is not listed here: its keys change meaning with its view mode, so
//! it receives them directly.
//!
//! Single-letter commands (`q`, `?`) only apply outside text entry: in the
//! editor and in grid prompts the letter belongs to the focused panel.

use crate::app::PanelFocus;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// A key combination (code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

impl From<KeyEvent> for KeyBind {
    fn from(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// What a key means, independent of which key it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Global
    Quit,
    ToggleHelp,
    CycleFocus,
    CycleFocusReverse,

    // Explorer navigation
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,

    // Explorer
    ToggleExpand,
    Expand,
    Collapse,
    PreviewTable,
    CountRows,
    ReloadSchema,

    // Editor
    ExecuteQuery,
    ClearEditor,
    FormatQuery,
    OpenCompletion,
}

/// Maps key combos to actions, globally and per panel
pub struct KeyMap {
    /// Checked first, whatever has focus
    global: HashMap<KeyBind, KeyAction>,
    /// Plain letters, skipped while text is being entered
    commands: HashMap<KeyBind, KeyAction>,
    panels: HashMap<PanelFocus, HashMap<KeyBind, KeyAction>>,
}

impl KeyMap {
    /// Resolve a key event: global bindings first, then letter commands
    /// unless `text_entry`, then the focused panel's
    pub fn resolve(&self, focus: PanelFocus, key: KeyEvent, text_entry: bool) -> Option<KeyAction> {
        let bind = KeyBind::from(key);
        if let Some(action) = self.global.get(&bind) {
            return Some(*action);
        }
        if !text_entry && let Some(action) = self.commands.get(&bind) {
            return Some(*action);
        }
        self.panels
            .get(&focus)
            .and_then(|m| m.get(&bind))
            .copied()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        let global = HashMap::from([
            (KeyBind::ctrl('c'), KeyAction::Quit),
            (KeyBind::plain(KeyCode::Tab), KeyAction::CycleFocus),
            (
                KeyBind::new(KeyCode::BackTab, KeyModifiers::SHIFT),
                KeyAction::CycleFocusReverse,
            ),
            // Some terminals report Shift+Tab without the modifier
            (KeyBind::plain(KeyCode::BackTab), KeyAction::CycleFocusReverse),
        ]);

        let commands = HashMap::from([
            (KeyBind::plain(KeyCode::Char('q')), KeyAction::Quit),
            (KeyBind::plain(KeyCode::Char('?')), KeyAction::ToggleHelp),
            // Shifted symbols arrive with SHIFT on some terminals
            (
                KeyBind::new(KeyCode::Char('?'), KeyModifiers::SHIFT),
                KeyAction::ToggleHelp,
            ),
        ]);

        let mut panels = HashMap::new();

        // ── Editor ───────────────────────────────────────────────
        let editor = HashMap::from([
            (KeyBind::plain(KeyCode::F(5)), KeyAction::ExecuteQuery),
            (KeyBind::ctrl('e'), KeyAction::ExecuteQuery),
            (KeyBind::ctrl('k'), KeyAction::ClearEditor),
            (KeyBind::ctrl('l'), KeyAction::FormatQuery),
            (KeyBind::ctrl(' '), KeyAction::OpenCompletion),
        ]);
        panels.insert(PanelFocus::QueryEditor, editor);

        // ── Explorer ─────────────────────────────────────────────
        let mut tree = HashMap::new();
        insert_scroll_nav(&mut tree);
        tree.extend([
            (KeyBind::plain(KeyCode::Enter), KeyAction::ToggleExpand),
            (KeyBind::plain(KeyCode::Right), KeyAction::Expand),
            (KeyBind::plain(KeyCode::Char('l')), KeyAction::Expand),
            (KeyBind::plain(KeyCode::Left), KeyAction::Collapse),
            (KeyBind::plain(KeyCode::Char('h')), KeyAction::Collapse),
            (KeyBind::plain(KeyCode::Char('s')), KeyAction::PreviewTable),
            (KeyBind::plain(KeyCode::Char('d')), KeyAction::CountRows),
            (KeyBind::plain(KeyCode::Char('r')), KeyAction::ReloadSchema),
        ]);
        panels.insert(PanelFocus::TreeBrowser, tree);

        Self {
            global,
            commands,
            panels,
        }
    }
}

/// Insert vertical navigation bindings (arrows + jk + page + Home/End)
fn insert_scroll_nav(map: &mut HashMap<KeyBind, KeyAction>) {
    map.extend([
        (KeyBind::plain(KeyCode::Down), KeyAction::MoveDown),
        (KeyBind::plain(KeyCode::Char('j')), KeyAction::MoveDown),
        (KeyBind::plain(KeyCode::Up), KeyAction::MoveUp),
        (KeyBind::plain(KeyCode::Char('k')), KeyAction::MoveUp),
        (KeyBind::plain(KeyCode::PageDown), KeyAction::PageDown),
        (KeyBind::plain(KeyCode::PageUp), KeyAction::PageUp),
        (KeyBind::plain(KeyCode::Home), KeyAction::GoToTop),
        (KeyBind::plain(KeyCode::End), KeyAction::GoToBottom),
    ]);
}
