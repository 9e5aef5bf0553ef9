//! Application state and event handling
//!
//! Central state machine: events come in, state updates, actions go out.
//! Nothing here performs I/O; the worker executes the returned `Action`.

use crate::completer::Completer;
use crate::config::ConnectionConfig;
use crate::db::{ColumnInfo, ResultSet, SchemaSnapshot};
use crate::error::Result;
use crate::keymap::{KeyAction, KeyMap};
use crate::ui::Component;
use crate::ui::ComponentAction;
use crate::ui::connect::{ConnectAction, ConnectScreen};
use crate::ui::editor::QueryEditor;
use crate::ui::help::HelpOverlay;
use crate::ui::layout::calculate_layout;
use crate::ui::results::{ResultsGrid, ViewMode};
use crate::ui::theme::Theme;
use crate::ui::tree::{ColumnRequest, SchemaTree};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use std::path::PathBuf;

/// Main application state
pub struct App {
    pub mode: AppMode,

    /// Which panel currently has focus
    pub focus: PanelFocus,

    /// Name of the connected database
    pub connection_name: Option<String>,

    /// UI components
    pub tree: SchemaTree,
    pub editor: QueryEditor,
    pub completer: Completer,
    pub grid: ResultsGrid,
    pub connect: ConnectScreen,
    pub help: HelpOverlay,

    /// Data-driven keybinding configuration
    pub keymap: KeyMap,

    /// UI theme (created once, reused every frame)
    pub theme: Theme,

    /// Status message to display
    pub status_message: Option<StatusMessage>,

    /// Profile to persist once the schema for it has loaded
    pending_save: Option<ConnectionConfig>,

    /// Persistent clipboard handle (kept alive to avoid Linux clipboard drop race)
    clipboard: Option<arboard::Clipboard>,

    /// Error from clipboard initialization
    clipboard_error: Option<String>,

    pub running: bool,
}

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Profile picker / URL input
    Connect,
    /// Explorer, editor and results
    Main,
}

/// Panel focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelFocus {
    TreeBrowser,
    QueryEditor,
    ResultsViewer,
}

/// Status message with severity level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub message: String,
    pub level: StatusLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Events delivered to the UI thread: input, plus one reply per worker task
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Bracketed paste from the terminal
    Paste(String),
    Resize(u16, u16),
    Connected {
        config: ConnectionConfig,
        database: String,
    },
    ConnectFailed(String),
    SchemaLoaded(SchemaSnapshot),
    SchemaFailed(String),
    ColumnsLoaded {
        schema: String,
        table: String,
        columns: Vec<ColumnInfo>,
    },
    ColumnsFailed {
        schema: String,
        table: String,
        error: String,
    },
    QueryCompleted(ResultSet),
    QueryFailed(String),
    /// Row count written, or the error text
    ExportFinished {
        path: String,
        result: std::result::Result<usize, String>,
    },
    ConnectionSaved(std::result::Result<(), String>),
}

/// Work for the worker (or the main loop, for `Quit`)
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Connect(ConnectionConfig),
    LoadSchema,
    LoadColumns { schema: String, table: String },
    ExecuteQuery(String),
    Export {
        path: PathBuf,
        payload: String,
        rows: usize,
    },
    SaveConnection(ConnectionConfig),
    Quit,
    None,
}

impl From<ColumnRequest> for Action {
    fn from(request: ColumnRequest) -> Self {
        Action::LoadColumns {
            schema: request.schema,
            table: request.table,
        }
    }
}

impl App {
    /// Start on the connect screen with the saved profiles
    pub fn new(profiles: Vec<ConnectionConfig>) -> Self {
        let (clipboard, clipboard_error) = match arboard::Clipboard::new() {
            Ok(c) => (Some(c), None),
            Err(e) => {
                tracing::debug!(error = %e, "clipboard unavailable");
                (None, Some(e.to_string()))
            }
        };
        Self {
            mode: AppMode::Connect,
            focus: PanelFocus::TreeBrowser,
            connection_name: None,
            tree: SchemaTree::new(),
            editor: QueryEditor::new(),
            completer: Completer::new(),
            grid: ResultsGrid::new(),
            connect: ConnectScreen::new(profiles),
            help: HelpOverlay::new(),
            keymap: KeyMap::default(),
            theme: Theme::default(),
            status_message: None,
            pending_save: None,
            clipboard,
            clipboard_error,
            running: true,
        }
    }

    /// Begin connecting without going through the picker (CLI DSN or profile)
    pub fn connect_to(&mut self, config: ConnectionConfig) -> Action {
        self.connect.set_connecting(&config.name);
        Action::Connect(config)
    }

    /// Handle an application event and return resulting action
    pub fn handle_event(&mut self, event: AppEvent) -> Result<Action> {
        match event {
            AppEvent::Key(key) => Ok(self.handle_key(key)),
            AppEvent::Paste(text) => {
                self.paste(&text);
                Ok(Action::None)
            }
            AppEvent::Resize(width, height) => {
                self.resize(width, height);
                Ok(Action::None)
            }
            AppEvent::Connected { config, database } => {
                tracing::info!(profile = %config.name, database = %database, "connected");
                self.mode = AppMode::Main;
                self.focus = PanelFocus::TreeBrowser;
                self.connection_name = Some(database);
                self.tree.reset();
                self.tree.set_loading(true);
                self.grid = ResultsGrid::new();
                self.status_message = None;
                self.pending_save = Some(config);
                Ok(Action::LoadSchema)
            }
            AppEvent::ConnectFailed(error) => {
                tracing::warn!(error = %error, "connect failed");
                self.mode = AppMode::Connect;
                self.connect.set_error(error);
                Ok(Action::None)
            }
            AppEvent::SchemaLoaded(snapshot) => {
                tracing::info!(
                    schemas = snapshot.schemas.len(),
                    tables = snapshot.table_count(),
                    "schema loaded"
                );
                self.tree.load(&snapshot.database, &snapshot.schemas);
                self.completer.set_table_names(snapshot.table_names());
                self.status_message = None;
                Ok(self.take_pending_save())
            }
            AppEvent::SchemaFailed(error) => {
                tracing::warn!(error = %error, "schema load failed");
                self.tree.set_error(error.clone());
                self.set_status(
                    format!("Failed to load schema: {}", error),
                    StatusLevel::Error,
                );
                Ok(self.take_pending_save())
            }
            AppEvent::ColumnsLoaded {
                schema,
                table,
                columns,
            } => {
                self.tree.attach_columns(&schema, &table, &columns);
                Ok(Action::None)
            }
            AppEvent::ColumnsFailed {
                schema,
                table,
                error,
            } => {
                tracing::warn!(%schema, %table, error = %error, "column load failed");
                self.tree.fetch_failed(&schema, &table);
                self.set_status(
                    format!("Failed to load columns: {}", error),
                    StatusLevel::Error,
                );
                Ok(Action::None)
            }
            AppEvent::QueryCompleted(result) => {
                tracing::info!(
                    rows = result.row_count,
                    elapsed_ms = result.execution_time.as_secs_f64() * 1000.0,
                    "query completed"
                );
                self.grid.set_result(result);
                self.status_message = None;
                Ok(Action::None)
            }
            AppEvent::QueryFailed(error) => {
                tracing::info!(error = %error, "query failed");
                self.grid.set_error(error);
                self.status_message = None;
                Ok(Action::None)
            }
            AppEvent::ExportFinished { path, result } => {
                match result {
                    Ok(rows) => self.set_status(
                        format!("Exported {} rows to {}", rows, path),
                        StatusLevel::Success,
                    ),
                    Err(e) => self.set_status(format!("Export failed: {}", e), StatusLevel::Error),
                }
                Ok(Action::None)
            }
            AppEvent::ConnectionSaved(result) => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "could not save connection");
                    self.set_status(
                        "Warning: could not save connection".to_string(),
                        StatusLevel::Warning,
                    );
                }
                Ok(Action::None)
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        // Any key closes the help overlay
        if self.help.is_visible() {
            self.help.hide();
            return Action::None;
        }

        if self.mode == AppMode::Connect {
            if is_ctrl_c(key) {
                return Action::Quit;
            }
            return match self.connect.handle_key(key) {
                ConnectAction::Connect(config) => {
                    self.status_message = None;
                    Action::Connect(config)
                }
                ConnectAction::Quit => Action::Quit,
                ConnectAction::Consumed => Action::None,
            };
        }

        if self.focus == PanelFocus::QueryEditor
            && self.completer.is_open()
            && let Some(action) = self.handle_completion_key(key)
        {
            return action;
        }

        if let Some(key_action) = self.keymap.resolve(self.focus, key, self.in_text_entry()) {
            return self.execute_key_action(key_action);
        }

        let component_action = match self.focus {
            PanelFocus::QueryEditor => {
                let result = self.editor.handle_key(key);
                if result == ComponentAction::Consumed && self.completer.is_open() {
                    self.completer
                        .refresh(self.editor.content(), self.editor.cursor());
                }
                result
            }
            PanelFocus::ResultsViewer => self.grid.handle_key(key),
            PanelFocus::TreeBrowser => self.tree.handle_key(key),
        };
        self.process_component_action(component_action)
    }

    /// Pasted text goes to whichever text input is active
    fn paste(&mut self, text: &str) {
        if self.help.is_visible() {
            return;
        }
        match self.mode {
            AppMode::Connect => self.connect.paste(text),
            AppMode::Main if self.focus == PanelFocus::QueryEditor => {
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.editor.insert_text(&text);
                self.completer.cancel();
            }
            AppMode::Main => {}
        }
    }

    /// Letters are text in the editor and answers in grid prompts
    fn in_text_entry(&self) -> bool {
        match self.focus {
            PanelFocus::QueryEditor => true,
            PanelFocus::ResultsViewer => self.grid.mode() != ViewMode::Normal,
            PanelFocus::TreeBrowser => false,
        }
    }

    /// Keys that steer an open completion dropdown. `None` lets the key
    /// through to the editor, which then refreshes the candidates.
    fn handle_completion_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up => self.completer.move_selection(-1),
            KeyCode::Down => self.completer.move_selection(1),
            KeyCode::Enter | KeyCode::Tab => {
                if let Some((text, cursor)) =
                    self.completer.accept(self.editor.content(), self.editor.cursor())
                {
                    self.editor.replace(text, cursor);
                }
            }
            KeyCode::Esc => self.completer.cancel(),
            _ => return None,
        }
        Some(Action::None)
    }

    fn execute_key_action(&mut self, action: KeyAction) -> Action {
        match action {
            // ── Global ───────────────────────────────────────
            KeyAction::Quit => Action::Quit,
            KeyAction::ToggleHelp => {
                self.help.toggle();
                Action::None
            }
            KeyAction::CycleFocus => {
                self.cycle_focus();
                Action::None
            }
            KeyAction::CycleFocusReverse => {
                self.cycle_focus_reverse();
                Action::None
            }

            // ── Explorer ─────────────────────────────────────
            KeyAction::MoveUp => {
                self.tree.move_up();
                Action::None
            }
            KeyAction::MoveDown => {
                self.tree.move_down();
                Action::None
            }
            KeyAction::PageUp => {
                self.tree.page_up();
                Action::None
            }
            KeyAction::PageDown => {
                self.tree.page_down();
                Action::None
            }
            KeyAction::GoToTop => {
                self.tree.go_to_top();
                Action::None
            }
            KeyAction::GoToBottom => {
                self.tree.go_to_bottom();
                Action::None
            }
            KeyAction::ToggleExpand => self
                .tree
                .toggle_selected()
                .map_or(Action::None, Action::from),
            KeyAction::Expand => self
                .tree
                .expand_selected()
                .map_or(Action::None, Action::from),
            KeyAction::Collapse => {
                self.tree.collapse_selected();
                Action::None
            }
            KeyAction::PreviewTable => match self.tree.preview_query() {
                Some(sql) => self.run_in_editor(sql),
                None => {
                    self.set_status("Select a table first".to_string(), StatusLevel::Info);
                    Action::None
                }
            },
            KeyAction::CountRows => match self.tree.count_query() {
                Some(sql) => self.run_in_editor(sql),
                None => {
                    self.set_status("Select a table first".to_string(), StatusLevel::Info);
                    Action::None
                }
            },
            KeyAction::ReloadSchema => {
                if self.connection_name.is_none() {
                    return Action::None;
                }
                self.tree.set_loading(true);
                Action::LoadSchema
            }

            // ── Editor ───────────────────────────────────────
            KeyAction::ExecuteQuery => {
                let sql = self.editor.content().trim().to_string();
                if sql.is_empty() {
                    Action::None
                } else {
                    self.start_query(sql)
                }
            }
            KeyAction::ClearEditor => {
                self.editor.clear();
                self.completer.cancel();
                Action::None
            }
            KeyAction::FormatQuery => {
                self.editor.format();
                self.completer.cancel();
                Action::None
            }
            KeyAction::OpenCompletion => {
                if !self
                    .completer
                    .open_at(self.editor.content(), self.editor.cursor())
                {
                    self.set_status("No completions".to_string(), StatusLevel::Info);
                }
                Action::None
            }
        }
    }

    fn process_component_action(&mut self, action: ComponentAction) -> Action {
        match action {
            ComponentAction::Consumed | ComponentAction::Ignored => Action::None,
            ComponentAction::SetEditorQuery(sql) => {
                self.editor.set_content(sql);
                self.completer.cancel();
                self.focus = PanelFocus::QueryEditor;
                Action::None
            }
            ComponentAction::Status(message) => {
                self.set_status(message, StatusLevel::Info);
                Action::None
            }
            ComponentAction::CopyToClipboard { text, label } => {
                self.copy_to_clipboard(&text, label);
                Action::None
            }
            ComponentAction::Export {
                filename,
                payload,
                rows,
            } => {
                self.set_status(format!("Exporting {}...", filename), StatusLevel::Info);
                Action::Export {
                    path: PathBuf::from(filename),
                    payload,
                    rows,
                }
            }
        }
    }

    /// Show `sql` in the editor and run it
    fn run_in_editor(&mut self, sql: String) -> Action {
        self.editor.set_content(sql.as_str());
        self.start_query(sql)
    }

    fn start_query(&mut self, sql: String) -> Action {
        tracing::debug!(sql = %sql, "executing");
        self.completer.cancel();
        self.grid.set_last_query(sql.as_str());
        self.grid.set_loading(true);
        self.status_message = None;
        Action::ExecuteQuery(sql)
    }

    fn take_pending_save(&mut self) -> Action {
        self.pending_save
            .take()
            .map_or(Action::None, Action::SaveConnection)
    }

    pub fn cycle_focus(&mut self) {
        self.completer.cancel();
        self.focus = match self.focus {
            PanelFocus::TreeBrowser => PanelFocus::QueryEditor,
            PanelFocus::QueryEditor => PanelFocus::ResultsViewer,
            PanelFocus::ResultsViewer => PanelFocus::TreeBrowser,
        };
    }

    fn cycle_focus_reverse(&mut self) {
        self.completer.cancel();
        self.focus = match self.focus {
            PanelFocus::TreeBrowser => PanelFocus::ResultsViewer,
            PanelFocus::QueryEditor => PanelFocus::TreeBrowser,
            PanelFocus::ResultsViewer => PanelFocus::QueryEditor,
        };
    }

    /// Push pane sizes down to the components that window their content
    pub fn resize(&mut self, width: u16, height: u16) {
        let layout = calculate_layout(Rect::new(0, 0, width, height));
        self.tree.resize(layout.explorer.height);
        self.grid.set_viewport(
            layout.results.width.saturating_sub(2),
            layout.results.height.saturating_sub(2),
        );
    }

    pub fn set_status(&mut self, message: String, level: StatusLevel) {
        self.status_message = Some(StatusMessage { message, level });
    }

    fn copy_to_clipboard(&mut self, text: &str, label: String) {
        if let Some(clipboard) = self.clipboard.as_mut() {
            match clipboard.set_text(text) {
                Ok(()) => self.set_status(label, StatusLevel::Success),
                Err(e) => {
                    self.set_status(format!("Copy failed: {}", e), StatusLevel::Error);
                }
            }
        } else {
            let reason = self.clipboard_error.as_deref().unwrap_or("unknown reason");
            self.set_status(
                format!("Copy failed: clipboard unavailable ({})", reason),
                StatusLevel::Error,
            );
        }
    }
}

fn is_ctrl_c(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}
