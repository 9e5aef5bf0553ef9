//! Background database work
//!
//! Every I/O `Action` becomes one task on the tokio runtime. Each task runs
//! under its time budget and answers with exactly one `AppEvent` on the
//! channel the UI loop drains.

use crate::app::{Action, AppEvent};
use crate::config::settings::TimeoutSettings;
use crate::config::{ConnectionConfig, save_connection, save_connection_to};
use crate::db::{ColumnInfo, Database, ResultSet, SchemaSnapshot};
use crate::error::{DbError, DbResult, ExportError};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// The current connection, replaced on every successful connect
type Slot<D> = Arc<RwLock<Option<Arc<D>>>>;

pub struct Worker<D: Database> {
    runtime: Handle,
    events: UnboundedSender<AppEvent>,
    timeouts: TimeoutSettings,
    connection: Slot<D>,
    /// Overrides `~/.pgpane/connections.toml`
    connections_file: Option<PathBuf>,
}

impl<D: Database> Worker<D> {
    pub fn new(runtime: Handle, events: UnboundedSender<AppEvent>, timeouts: TimeoutSettings) -> Self {
        Self {
            runtime,
            events,
            timeouts,
            connection: Arc::new(RwLock::new(None)),
            connections_file: None,
        }
    }

    /// Save profiles to `path` instead of the default config file
    pub fn with_connections_file(mut self, path: PathBuf) -> Self {
        self.connections_file = Some(path);
        self
    }

    /// Start the task for `action`. `Quit` and `None` have no background
    /// work and return `None`.
    pub fn dispatch(&self, action: Action) -> Option<JoinHandle<()>> {
        let events = self.events.clone();
        let slot = Arc::clone(&self.connection);
        match action {
            Action::Connect(config) => {
                let limit = self.timeouts.connect();
                Some(self.runtime.spawn(async move {
                    let _ = events.send(connect(slot, config, limit).await);
                }))
            }
            Action::LoadSchema => {
                let limit = self.timeouts.schema();
                Some(self.runtime.spawn(async move {
                    let event = match load_schema(&slot, limit).await {
                        Ok(snapshot) => AppEvent::SchemaLoaded(snapshot),
                        Err(e) => AppEvent::SchemaFailed(e.to_string()),
                    };
                    let _ = events.send(event);
                }))
            }
            Action::LoadColumns { schema, table } => {
                let limit = self.timeouts.columns();
                Some(self.runtime.spawn(async move {
                    tracing::debug!(%schema, %table, "loading columns");
                    let event = match load_columns(&slot, &schema, &table, limit).await {
                        Ok(columns) => AppEvent::ColumnsLoaded {
                            schema,
                            table,
                            columns,
                        },
                        Err(e) => AppEvent::ColumnsFailed {
                            schema,
                            table,
                            error: e.to_string(),
                        },
                    };
                    let _ = events.send(event);
                }))
            }
            Action::ExecuteQuery(sql) => {
                let limit = self.timeouts.query();
                Some(self.runtime.spawn(async move {
                    let event = match execute(&slot, &sql, limit).await {
                        Ok(result) => AppEvent::QueryCompleted(result),
                        Err(e) => AppEvent::QueryFailed(e.to_string()),
                    };
                    let _ = events.send(event);
                }))
            }
            Action::Export {
                path,
                payload,
                rows,
            } => Some(self.runtime.spawn(async move {
                let _ = events.send(export(path, payload, rows).await);
            })),
            Action::SaveConnection(config) => {
                let file = self.connections_file.clone();
                Some(self.runtime.spawn(async move {
                    let _ = events.send(AppEvent::ConnectionSaved(save(config, file).await));
                }))
            }
            Action::Quit | Action::None => None,
        }
    }
}

/// Run `fut` under `limit`; expiry becomes `DbError::Timeout(what)`
async fn with_timeout<T>(
    limit: Duration,
    what: &'static str,
    fut: impl Future<Output = DbResult<T>>,
) -> DbResult<T> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| DbError::Timeout(what))?
}

async fn current<D: Database>(slot: &Slot<D>) -> DbResult<Arc<D>> {
    slot.read().await.clone().ok_or(DbError::NotConnected)
}

async fn connect<D: Database>(slot: Slot<D>, config: ConnectionConfig, limit: Duration) -> AppEvent {
    tracing::info!(
        profile = %config.name,
        host = %config.host,
        port = config.port,
        database = %config.database,
        "connecting"
    );
    match with_timeout(limit, "connect", D::connect(&config)).await {
        Ok(db) => {
            let database = db.database_name().to_string();
            *slot.write().await = Some(Arc::new(db));
            AppEvent::Connected { config, database }
        }
        Err(e) => {
            tracing::warn!(profile = %config.name, error = %e, "connect failed");
            AppEvent::ConnectFailed(e.to_string())
        }
    }
}

async fn load_schema<D: Database>(slot: &Slot<D>, limit: Duration) -> DbResult<SchemaSnapshot> {
    let db = current(slot).await?;
    with_timeout(limit, "schema load", db.load_schema()).await
}

async fn load_columns<D: Database>(
    slot: &Slot<D>,
    schema: &str,
    table: &str,
    limit: Duration,
) -> DbResult<Vec<ColumnInfo>> {
    let db = current(slot).await?;
    with_timeout(limit, "column load", db.load_columns(schema, table)).await
}

async fn execute<D: Database>(slot: &Slot<D>, sql: &str, limit: Duration) -> DbResult<ResultSet> {
    let db = current(slot).await?;
    with_timeout(limit, "query", db.execute_query(sql)).await
}

async fn export(path: PathBuf, payload: String, rows: usize) -> AppEvent {
    let shown = path.display().to_string();
    let result = match tokio::fs::write(&path, payload).await {
        Ok(()) => {
            tracing::info!(path = %shown, rows, "exported results");
            Ok(rows)
        }
        Err(source) => {
            let err = ExportError::Write {
                path: shown.clone(),
                source,
            };
            tracing::warn!(error = %err, "export failed");
            Err(err.to_string())
        }
    };
    AppEvent::ExportFinished {
        path: shown,
        result,
    }
}

async fn save(config: ConnectionConfig, file: Option<PathBuf>) -> Result<(), String> {
    let joined = tokio::task::spawn_blocking(move || match file {
        Some(path) => save_connection_to(&path, &config),
        None => save_connection(&config),
    })
    .await;
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "saving connection failed");
            Err(e.to_string())
        }
        Err(e) => Err(e.to_string()),
    }
}
