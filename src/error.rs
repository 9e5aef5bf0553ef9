//! Error types for pgpane
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors with clear error chains.

use std::io;

/// Main error type for the pgpane application
#[derive(Debug, thiserror::Error)]
pub enum PgpaneError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Database operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DbError {
    /// Failed to establish connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("{0}")]
    QueryFailed(String),

    /// Schema introspection failed
    #[error("Schema loading failed: {0}")]
    SchemaLoadFailed(String),

    /// Column metadata for a single table failed
    #[error("Column loading failed: {0}")]
    ColumnLoadFailed(String),

    /// Not connected to a database
    #[error("Not connected to database")]
    NotConnected,

    /// Operation exceeded its time budget
    #[error("{0} timed out")]
    Timeout(&'static str),
}

/// Configuration loading/parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Home directory not found
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// Reading or writing a config file failed
    #[error("Config file error: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to write TOML
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Connection profile not found
    #[error("Connection profile '{0}' not found")]
    ProfileNotFound(String),
}

/// Export write errors
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("{path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Specialized Result type for pgpane operations
pub type Result<T> = std::result::Result<T, PgpaneError>;

/// Specialized Result type for database operations
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Specialized Result type for config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
