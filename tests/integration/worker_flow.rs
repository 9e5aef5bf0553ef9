//! End-to-end flows through `App` and `Worker` against the mock database
//!
//! Each step dispatches an action, waits for the task, and feeds its single
//! reply back into the app, the way the event loop does.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pgpane::app::{Action, App, AppEvent, AppMode, PanelFocus, StatusLevel};
use pgpane::config::ConnectionConfig;
use pgpane::config::load_connections_from;
use pgpane::config::settings::TimeoutSettings;
use pgpane::worker::Worker;
use tempfile::TempDir;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::common::{MockDatabase, UNREACHABLE_HOST, test_config};

struct Harness {
    app: App,
    worker: Worker<MockDatabase>,
    rx: UnboundedReceiver<AppEvent>,
    dir: TempDir,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        let timeouts = TimeoutSettings {
            connect: 5,
            schema: 5,
            columns: 5,
            query: 1,
        };
        let worker = Worker::new(Handle::current(), tx, timeouts)
            .with_connections_file(dir.path().join("connections.toml"));
        let mut app = App::new(vec![]);
        app.resize(120, 40);
        Self {
            app,
            worker,
            rx,
            dir,
        }
    }

    /// Connected to the mock with the schema loaded and the profile saved
    async fn connected() -> Self {
        let mut h = Self::new();
        let action = h.app.connect_to(test_config());
        let action = h.step(action).await;
        assert_eq!(action, Action::LoadSchema);
        let action = h.step(action).await;
        assert!(matches!(action, Action::SaveConnection(_)));
        assert_eq!(h.step(action).await, Action::None);
        h
    }

    fn connections_file(&self) -> PathBuf {
        self.dir.path().join("connections.toml")
    }

    /// Run one action to completion and hand its reply to the app
    async fn step(&mut self, action: Action) -> Action {
        let task = self
            .worker
            .dispatch(action)
            .expect("action should start background work");
        task.await.unwrap();
        let event = self.rx.recv().await.unwrap();
        self.app.handle_event(event).unwrap()
    }

    fn key(&mut self, code: KeyCode) -> Action {
        self.app
            .handle_event(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
            .unwrap()
    }

    fn status(&self) -> &str {
        self.app
            .status_message
            .as_ref()
            .map(|s| s.message.as_str())
            .unwrap_or("")
    }
}

// ── Connection ───────────────────────────────────────────────

#[tokio::test]
async fn test_connect_loads_schema_and_saves_profile() {
    let h = Harness::connected().await;
    assert_eq!(h.app.mode, AppMode::Main);
    assert_eq!(h.app.connection_name.as_deref(), Some("shop"));
    assert!(h.app.tree.find_table("audit", "events").is_some());
    assert!(h.app.completer.table_names().contains(&"users".to_string()));

    let saved = load_connections_from(&h.connections_file()).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].database, "shop");
    assert!(saved[0].password.is_none());
    let raw = std::fs::read_to_string(h.connections_file()).unwrap();
    assert!(!raw.contains("secret"));
}

#[tokio::test]
async fn test_connect_failure_returns_to_picker() {
    let mut h = Harness::new();
    let config = ConnectionConfig {
        host: UNREACHABLE_HOST.to_string(),
        ..test_config()
    };
    let action = h.app.connect_to(config);
    assert_eq!(h.step(action).await, Action::None);
    assert_eq!(h.app.mode, AppMode::Connect);
    assert!(h.app.connect.error().unwrap().contains("could not connect"));
    // No connection was stored
    h.step(Action::LoadSchema).await;
    assert_eq!(h.status(), "Failed to load schema: Not connected to database");
}

#[tokio::test]
async fn test_schema_without_connection_fails() {
    let mut h = Harness::new();
    assert_eq!(h.step(Action::LoadSchema).await, Action::None);
    assert_eq!(h.status(), "Failed to load schema: Not connected to database");
}

#[tokio::test]
async fn test_quit_and_none_start_nothing() {
    let h = Harness::new();
    assert!(h.worker.dispatch(Action::Quit).is_none());
    assert!(h.worker.dispatch(Action::None).is_none());
}

// ── Explorer ─────────────────────────────────────────────────

#[tokio::test]
async fn test_expanding_table_fetches_columns() {
    let mut h = Harness::connected().await;
    // shop, public, audit -> expand public
    h.key(KeyCode::Down);
    h.key(KeyCode::Enter);
    // shop, public, broken, orders, users, audit
    for _ in 0..3 {
        h.key(KeyCode::Down);
    }
    let action = h.key(KeyCode::Enter);
    assert_eq!(
        action,
        Action::LoadColumns {
            schema: "public".to_string(),
            table: "users".to_string()
        }
    );
    assert_eq!(h.step(action).await, Action::None);

    let users = h.app.tree.find_table("public", "users").unwrap();
    assert!(users.loaded);
    assert!(users.expanded);
    assert_eq!(users.children.len(), 2);
    // Collapse and expand again without another fetch
    assert_eq!(h.key(KeyCode::Enter), Action::None);
    assert_eq!(h.key(KeyCode::Enter), Action::None);
}

#[tokio::test]
async fn test_failed_column_fetch_can_be_retried() {
    let mut h = Harness::connected().await;
    h.key(KeyCode::Down);
    h.key(KeyCode::Enter);
    h.key(KeyCode::Down);
    let action = h.key(KeyCode::Enter);
    assert!(matches!(action, Action::LoadColumns { ref table, .. } if table == "broken"));
    h.step(action).await;

    assert!(h.status().starts_with("Failed to load columns:"));
    assert_eq!(
        h.app.status_message.as_ref().unwrap().level,
        StatusLevel::Error
    );
    let broken = h.app.tree.find_table("public", "broken").unwrap();
    assert!(!broken.expanded);
    assert!(matches!(h.key(KeyCode::Enter), Action::LoadColumns { .. }));
}

#[tokio::test]
async fn test_stale_columns_are_ignored() {
    let mut h = Harness::connected().await;
    let before = h.app.tree.items().len();
    h.app
        .handle_event(AppEvent::ColumnsLoaded {
            schema: "gone".to_string(),
            table: "dropped".to_string(),
            columns: crate::common::user_columns(),
        })
        .unwrap();
    assert_eq!(h.app.tree.items().len(), before);
}

#[tokio::test]
async fn test_preview_key_runs_query() {
    let mut h = Harness::connected().await;
    h.key(KeyCode::Down);
    h.key(KeyCode::Enter);
    h.key(KeyCode::Down);
    h.key(KeyCode::Down);
    let action = h.key(KeyCode::Char('s'));
    assert_eq!(
        action,
        Action::ExecuteQuery(r#"SELECT * FROM "public"."orders" LIMIT 100"#.to_string())
    );
    h.step(action).await;
    assert_eq!(h.app.grid.result().unwrap().row_count, 2);
}

// ── Queries ──────────────────────────────────────────────────

#[tokio::test]
async fn test_query_round_trip() {
    let mut h = Harness::connected().await;
    h.app.focus = PanelFocus::QueryEditor;
    h.app.editor.set_content("SELECT * FROM users");
    let action = h.key(KeyCode::F(5));
    assert!(h.app.grid.is_loading());
    h.step(action).await;

    assert!(!h.app.grid.is_loading());
    assert_eq!(h.app.grid.result().unwrap().columns, ["id", "name"]);
    assert_eq!(h.app.focus, PanelFocus::QueryEditor);
}

#[tokio::test]
async fn test_query_error_is_shown_in_grid() {
    let mut h = Harness::connected().await;
    h.app.focus = PanelFocus::QueryEditor;
    h.app.editor.set_content("SELECT fail");
    let action = h.key(KeyCode::F(5));
    h.step(action).await;
    assert!(h.app.grid.error().unwrap().contains("syntax error"));
    assert!(h.app.grid.result().is_none());
}

#[tokio::test]
async fn test_slow_query_times_out() {
    let mut h = Harness::connected().await;
    h.app.focus = PanelFocus::QueryEditor;
    h.app.editor.set_content("SELECT sleep");
    let action = h.key(KeyCode::F(5));
    h.step(action).await;
    assert_eq!(h.app.grid.error(), Some("query timed out"));
}

// ── Results actions ──────────────────────────────────────────

#[tokio::test]
async fn test_export_json_writes_file() {
    let mut h = Harness::connected().await;
    h.app.editor.set_content("SELECT * FROM users");
    h.app.focus = PanelFocus::QueryEditor;
    let action = h.key(KeyCode::F(5));
    h.step(action).await;

    h.app.focus = PanelFocus::ResultsViewer;
    assert_eq!(h.key(KeyCode::Char('e')), Action::None);
    let Action::Export {
        path,
        payload,
        rows,
    } = h.key(KeyCode::Char('j'))
    else {
        panic!("expected an export action");
    };
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("pgpane_export_") && name.ends_with(".json"));

    // Write into the temp dir rather than the working directory
    let target = h.dir.path().join(&name);
    h.step(Action::Export {
        path: target.clone(),
        payload,
        rows,
    })
    .await;

    assert!(h.status().starts_with("Exported 2 rows to "));
    let written = std::fs::read_to_string(target).unwrap();
    assert!(written.contains(r#""name": "O'Brien""#));
    assert!(written.contains(r#""name": null"#));
}

#[tokio::test]
async fn test_export_to_missing_dir_reports_failure() {
    let mut h = Harness::connected().await;
    let target = h.dir.path().join("no-such-dir").join("out.csv");
    h.step(Action::Export {
        path: target,
        payload: "id\n".to_string(),
        rows: 0,
    })
    .await;
    assert!(h.status().starts_with("Export failed: "));
}

#[tokio::test]
async fn test_delete_confirm_fills_editor() {
    let mut h = Harness::connected().await;
    h.app.focus = PanelFocus::QueryEditor;
    h.app.editor.set_content("SELECT * FROM users");
    let action = h.key(KeyCode::F(5));
    h.step(action).await;

    h.app.focus = PanelFocus::ResultsViewer;
    h.key(KeyCode::Char('j'));
    h.key(KeyCode::Char('D'));
    assert_eq!(h.key(KeyCode::Char('y')), Action::None);
    assert_eq!(h.app.focus, PanelFocus::QueryEditor);
    assert_eq!(
        h.app.editor.content(),
        "-- review before executing!\nDELETE FROM users WHERE id = '2' AND name IS NULL"
    );
}
