//! Help overlay: keybinding reference modal
//!
//! Lists the bindings per pane as a centered popup. Any key closes it.

use crate::ui::layout::centered;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Help overlay showing keybinding reference
#[derive(Debug, Default)]
pub struct HelpOverlay {
    visible: bool,
}

/// Total number of content lines in the help text
const HELP_LINE_COUNT: usize = 46;
const HELP_WIDTH: u16 = 62;

impl HelpOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Build styled help content lines
    fn build_lines<'a>(&self, theme: &Theme) -> Vec<Line<'a>> {
        let section = theme.help_section;
        let key = theme.help_key;
        let desc = theme.help_desc;
        let blank = Line::from("");

        vec![
            Line::from(Span::styled("Global", section)),
            help_line("  Ctrl+C", "Quit", key, desc),
            help_line("  q", "Quit (outside the editor)", key, desc),
            help_line("  Tab / Shift+Tab", "Cycle panel focus", key, desc),
            help_line("  ?", "Toggle this help", key, desc),
            blank.clone(),
            Line::from(Span::styled("Explorer", section)),
            help_line("  j/k  \u{2191}/\u{2193}", "Navigate", key, desc),
            help_line("  PgUp / PgDn", "Page up / down", key, desc),
            help_line("  Enter", "Toggle expand", key, desc),
            help_line("  l / \u{2192}", "Expand", key, desc),
            help_line("  h / \u{2190}", "Collapse / go to parent", key, desc),
            help_line("  s", "Preview first 100 rows", key, desc),
            help_line("  d", "Count rows", key, desc),
            help_line("  r", "Reload schema", key, desc),
            blank.clone(),
            Line::from(Span::styled("Editor", section)),
            help_line("  F5 / Ctrl+E", "Execute query", key, desc),
            help_line("  Ctrl+K", "Clear editor", key, desc),
            help_line("  Ctrl+L", "Uppercase keywords", key, desc),
            help_line("  Ctrl+Space", "Open completions", key, desc),
            help_line("  \u{2191}/\u{2193}", "Select completion", key, desc),
            help_line("  Enter / Tab", "Accept completion", key, desc),
            help_line("  Esc", "Close completions", key, desc),
            blank.clone(),
            Line::from(Span::styled("Results", section)),
            help_line("  j/k  \u{2191}/\u{2193}", "Navigate rows", key, desc),
            help_line("  h/l  \u{2190}/\u{2192}", "Navigate columns", key, desc),
            help_line("  PgUp / PgDn", "Page up / down", key, desc),
            help_line("  g / G", "First / last row", key, desc),
            help_line("  0 / $  Home / End", "First / last column", key, desc),
            help_line("  Enter", "Record view", key, desc),
            help_line("  c", "Copy cell", key, desc),
            help_line("  y", "Copy row (json / csv / text)", key, desc),
            help_line("  e", "Export results (json / csv)", key, desc),
            help_line("  f", "Filter by this value", key, desc),
            help_line("  D", "Generate DELETE for row", key, desc),
            help_line("  Esc", "Close prompt or record view", key, desc),
            blank.clone(),
            Line::from(Span::styled("Connect screen", section)),
            help_line("  j/k  \u{2191}/\u{2193}", "Choose profile", key, desc),
            help_line("  Enter", "Connect", key, desc),
            help_line("  n", "New connection URL", key, desc),
            help_line("  Esc", "Back to profiles", key, desc),
            blank,
            Line::from(Span::styled("Press any key to close", theme.muted)),
        ]
    }

    /// Render the popup centered over `area`
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if !self.visible || area.height == 0 {
            return;
        }
        let lines = self.build_lines(theme);
        let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
        let popup = centered(area, HELP_WIDTH, height);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Keys ")
            .border_style(theme.border_focused);
        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}

/// Build a single help line: "  key           description"
fn help_line<'a>(
    key_text: &'a str,
    desc_text: &'a str,
    key_style: Style,
    desc_style: Style,
) -> Line<'a> {
    // Pad key to 22 chars for alignment
    let padded_key = format!("{:<22}", key_text);
    Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc_text, desc_style),
    ])
}
