//! Top-level render function
//!
//! Draws the connect screen or the three panes, then the overlays.

use crate::app::{App, AppMode, PanelFocus};
use crate::ui::Component;
use crate::ui::layout::calculate_layout;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

const KEY_HINTS: &str = "Tab focus | F5 run | Ctrl+Space complete | ? help | q quit";

/// Render the entire application
pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();

    match app.mode {
        AppMode::Connect => app.connect.render(frame, area, theme),
        AppMode::Main => {
            let layout = calculate_layout(area);
            app.tree.render(
                frame,
                layout.explorer,
                app.focus == PanelFocus::TreeBrowser,
                theme,
            );
            app.editor.render(
                frame,
                layout.editor,
                app.focus == PanelFocus::QueryEditor,
                theme,
            );
            app.grid.render(
                frame,
                layout.results,
                app.focus == PanelFocus::ResultsViewer,
                theme,
            );
            render_status_bar(frame, layout.status, app, theme);

            if app.focus == PanelFocus::QueryEditor
                && let Some(state) = app.completer.state()
            {
                app.editor
                    .render_completions(frame, layout.editor, state, theme);
            }
        }
    }

    app.help.render(frame, area, theme);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let connection = match app.connection_name {
        Some(ref name) => Span::styled(format!("\u{25cf} {} ", name), theme.status_connected),
        None => Span::styled("\u{25cf} disconnected ", theme.status_disconnected),
    };

    let message = match app.status_message {
        Some(ref status) => Span::styled(
            status.message.clone(),
            theme.status_style(status.level),
        ),
        None => Span::styled(KEY_HINTS, theme.muted),
    };

    frame.render_widget(Paragraph::new(Line::from(vec![connection, message])), area);
}
