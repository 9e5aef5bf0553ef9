//! File logging via `tracing`
//!
//! The terminal belongs to the UI, so every log line goes to a daily-rolling
//! file under `~/.pgpane/logs/`. `RUST_LOG` overrides the configured level.

use crate::config::settings::LogSettings;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Base name of the rolling log file
const LOG_FILE_PREFIX: &str = "pgpane.log";

/// Default log directory (`~/.pgpane/logs`)
pub fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pgpane")
        .join("logs")
}

/// Build the filter: RUST_LOG takes precedence over the settings level
fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// Returns `None` when logging is disabled. The returned guard flushes the
/// background writer on drop, so the caller must hold it until exit.
pub fn init(settings: &LogSettings, log_dir: &Path) -> anyhow::Result<Option<WorkerGuard>> {
    if !settings.enabled {
        return Ok(None);
    }

    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    tracing_subscriber::registry()
        .with(build_filter(&settings.level))
        .with(file_layer)
        .try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %log_dir.display(),
        "logging initialized"
    );

    Ok(Some(guard))
}
