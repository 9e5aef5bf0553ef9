//! Database provider trait
//!
//! Defines the interface the background worker drives. Every method resolves
//! to a fully materialized value; the UI never sees partial results.
//! Mock implementations of this trait back the worker tests.

use crate::config::ConnectionConfig;
use crate::db::schema::SchemaSnapshot;
use crate::db::types::{ColumnInfo, ResultSet};
use crate::error::DbResult;
use std::future::Future;

/// Main database provider trait
///
/// Futures are `Send` so the worker can run them on the tokio runtime.
pub trait Database: Send + Sync + Sized + 'static {
    /// Establish a connection
    ///
    /// # Errors
    /// Returns `DbError::ConnectionFailed` if the server cannot be reached
    fn connect(config: &ConnectionConfig) -> impl Future<Output = DbResult<Self>> + Send;

    /// Name of the connected database
    fn database_name(&self) -> &str;

    /// Load the schema skeleton (schemas and table names, no columns)
    ///
    /// # Errors
    /// Returns `DbError::SchemaLoadFailed` if introspection fails
    fn load_schema(&self) -> impl Future<Output = DbResult<SchemaSnapshot>> + Send;

    /// Load column metadata for one table, ordered by ordinal position
    ///
    /// # Errors
    /// Returns `DbError::ColumnLoadFailed` if introspection fails
    fn load_columns(
        &self,
        schema: &str,
        table: &str,
    ) -> impl Future<Output = DbResult<Vec<ColumnInfo>>> + Send;

    /// Execute a SQL statement and stringify the result set
    ///
    /// # Errors
    /// Returns `DbError::QueryFailed` with the server's message
    fn execute_query(&self, sql: &str) -> impl Future<Output = DbResult<ResultSet>> + Send;
}
