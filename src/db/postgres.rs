//! PostgreSQL database provider
//!
//! Concrete implementation using tokio-postgres. Queries go through the
//! simple query protocol so every value arrives as text, which is exactly
//! what the results grid displays.

use crate::config::ConnectionConfig;
use crate::config::connections::SslMode;
use crate::db::Database;
use crate::db::schema::{SchemaEntry, SchemaSnapshot};
use crate::db::types::{ColumnInfo, NULL, ResultSet};
use crate::error::{DbError, DbResult};
use futures::future::try_join_all;
use std::time::Instant;
use tokio_postgres::{Client, SimpleQueryMessage};

const LIST_SCHEMAS: &str = "
    SELECT schema_name::text
    FROM information_schema.schemata
    WHERE schema_name NOT IN ('pg_catalog', 'information_schema', 'pg_toast')
      AND schema_name NOT LIKE 'pg_temp_%'
      AND schema_name NOT LIKE 'pg_toast_temp_%'
    ORDER BY schema_name";

const LIST_TABLES: &str = "
    SELECT table_name::text
    FROM information_schema.tables
    WHERE table_schema = $1
      AND table_type = 'BASE TABLE'
    ORDER BY table_name";

const LIST_COLUMNS: &str = "
    SELECT
        c.column_name::text,
        c.data_type::text,
        c.is_nullable = 'YES',
        c.column_default::text,
        c.ordinal_position::int,
        pk.column_name IS NOT NULL
    FROM information_schema.columns c
    LEFT JOIN (
        SELECT ku.column_name
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage ku
            ON tc.constraint_name = ku.constraint_name
           AND tc.table_schema = ku.table_schema
        WHERE tc.constraint_type = 'PRIMARY KEY'
          AND tc.table_schema = $1
          AND tc.table_name = $2
    ) pk ON c.column_name = pk.column_name
    WHERE c.table_schema = $1
      AND c.table_name = $2
    ORDER BY c.ordinal_position";

/// PostgreSQL database provider
pub struct PostgresProvider {
    /// The tokio-postgres client
    client: Client,
    /// Database name from the connection profile
    database: String,
}

impl PostgresProvider {
    async fn list_tables(&self, schema: String) -> DbResult<SchemaEntry> {
        let rows = self
            .client
            .query(LIST_TABLES, &[&schema])
            .await
            .map_err(|e| DbError::SchemaLoadFailed(e.to_string()))?;
        let tables = rows
            .iter()
            .map(|r| r.try_get::<_, String>(0))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::SchemaLoadFailed(e.to_string()))?;
        Ok(SchemaEntry {
            name: schema,
            tables,
        })
    }
}

impl Database for PostgresProvider {
    async fn connect(config: &ConnectionConfig) -> DbResult<Self> {
        let conn_string = config
            .clone()
            .with_env_password()
            .connection_string_with_password();

        let client = match config.ssl_mode {
            SslMode::Disable => {
                let (client, connection) =
                    tokio_postgres::connect(&conn_string, tokio_postgres::NoTls)
                        .await
                        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        tracing::warn!(error = %e, "connection lost");
                    }
                });
                client
            }
            SslMode::Prefer | SslMode::Require => {
                let tls = tokio_postgres_rustls::MakeRustlsConnect::new(make_tls_config());
                let (client, connection) = tokio_postgres::connect(&conn_string, tls)
                    .await
                    .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        tracing::warn!(error = %e, "connection lost");
                    }
                });
                client
            }
        };

        Ok(Self {
            client,
            database: config.database.clone(),
        })
    }

    fn database_name(&self) -> &str {
        &self.database
    }

    async fn load_schema(&self) -> DbResult<SchemaSnapshot> {
        let rows = self
            .client
            .query(LIST_SCHEMAS, &[])
            .await
            .map_err(|e| DbError::SchemaLoadFailed(e.to_string()))?;
        let names = rows
            .iter()
            .map(|r| r.try_get::<_, String>(0))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::SchemaLoadFailed(e.to_string()))?;

        // Table lists per schema are independent; fetch them concurrently
        let schemas = try_join_all(names.into_iter().map(|n| self.list_tables(n))).await?;

        Ok(SchemaSnapshot {
            database: self.database.clone(),
            schemas,
        })
    }

    async fn load_columns(&self, schema: &str, table: &str) -> DbResult<Vec<ColumnInfo>> {
        let rows = self
            .client
            .query(LIST_COLUMNS, &[&schema, &table])
            .await
            .map_err(|e| DbError::ColumnLoadFailed(e.to_string()))?;

        rows.iter()
            .map(|r| {
                Ok(ColumnInfo {
                    name: r.try_get(0)?,
                    data_type: r.try_get(1)?,
                    nullable: r.try_get(2)?,
                    default: r.try_get(3)?,
                    ordinal: r.try_get(4)?,
                    is_primary_key: r.try_get(5)?,
                })
            })
            .collect::<Result<Vec<_>, tokio_postgres::Error>>()
            .map_err(|e| DbError::ColumnLoadFailed(e.to_string()))
    }

    async fn execute_query(&self, sql: &str) -> DbResult<ResultSet> {
        let start = Instant::now();

        let messages = self
            .client
            .simple_query(sql)
            .await
            .map_err(|e| DbError::QueryFailed(describe_pg_error(&e)))?;

        Ok(collect_result(messages, start))
    }
}

/// Fold simple-query messages into a result set.
///
/// With several statements, the last one that produced a row description
/// wins. A batch without any (e.g. a lone UPDATE) reports the affected count.
fn collect_result(messages: Vec<SimpleQueryMessage>, start: Instant) -> ResultSet {
    let mut columns: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut affected: u64 = 0;

    for message in messages {
        match message {
            SimpleQueryMessage::RowDescription(desc) => {
                columns = Some(desc.iter().map(|c| c.name().to_string()).collect());
                rows.clear();
            }
            SimpleQueryMessage::Row(row) => {
                let values = (0..row.len())
                    .map(|i| row.get(i).unwrap_or(NULL).to_string())
                    .collect();
                rows.push(values);
            }
            SimpleQueryMessage::CommandComplete(n) => affected = n,
            _ => {}
        }
    }

    match columns {
        Some(columns) => ResultSet::new(columns, rows, start.elapsed()),
        None => ResultSet::new(
            vec!["rows_affected".to_string()],
            vec![vec![affected.to_string()]],
            start.elapsed(),
        ),
    }
}

/// Prefer the server's message over tokio-postgres's generic "db error"
fn describe_pg_error(e: &tokio_postgres::Error) -> String {
    match e.as_db_error() {
        Some(db) => format!("{}: {}", db.severity(), db.message()),
        None => e.to_string(),
    }
}

/// Build a rustls ClientConfig that trusts OS certificates (with Mozilla roots as fallback)
fn make_tls_config() -> rustls::ClientConfig {
    let mut root_store = rustls::RootCertStore::empty();

    let native_certs = rustls_native_certs::load_native_certs();
    let loaded = native_certs
        .certs
        .into_iter()
        .filter(|cert| root_store.add(cert.clone()).is_ok())
        .count();
    if loaded == 0 {
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth()
}
