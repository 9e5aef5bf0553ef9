//! Integration tests for PostgresProvider
//!
//! These need a reachable PostgreSQL server and skip themselves otherwise.
//! Connection settings come from TEST_DB_* variables (see `integration.rs`).

use pgpane::config::ConnectionConfig;
use pgpane::config::SslMode;
use pgpane::db::postgres::PostgresProvider;
use pgpane::db::{Database, NULL};
use pgpane::error::DbError;

const FIXTURE_TABLE: &str = "pgpane_it_items";

/// Get test database connection config
fn test_config() -> ConnectionConfig {
    ConnectionConfig {
        name: "integration-test".to_string(),
        host: std::env::var("TEST_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: std::env::var("TEST_DB_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5433),
        database: std::env::var("TEST_DB_NAME").unwrap_or_else(|_| "test_db".to_string()),
        username: std::env::var("TEST_DB_USER").unwrap_or_else(|_| "test_user".to_string()),
        password: Some(
            std::env::var("TEST_DB_PASSWORD").unwrap_or_else(|_| "test_password".to_string()),
        ),
        ssl_mode: SslMode::Disable,
    }
}

async fn connect_or_skip() -> Option<PostgresProvider> {
    let config = test_config();
    match PostgresProvider::connect(&config).await {
        Ok(p) => Some(p),
        Err(e) => {
            eprintln!(
                "Skipping test: Database not available at {}:{} - {}",
                config.host, config.port, e
            );
            None
        }
    }
}

/// Create the fixture table if needed
async fn ensure_fixture(provider: &PostgresProvider) {
    provider
        .execute_query(&format!(
            "CREATE TABLE IF NOT EXISTS public.{FIXTURE_TABLE} (
                id integer PRIMARY KEY,
                label text,
                price numeric(10, 2) DEFAULT 0
            )"
        ))
        .await
        .expect("fixture table should be creatable");
}

#[tokio::test]
async fn test_execute_simple_query() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };
    let results = provider
        .execute_query("SELECT 1 AS num, 'hello' AS msg")
        .await
        .unwrap();
    assert_eq!(results.columns, ["num", "msg"]);
    assert_eq!(results.row_count, 1);
    assert_eq!(results.rows[0], ["1", "hello"]);
}

#[tokio::test]
async fn test_null_becomes_sentinel() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };
    let results = provider
        .execute_query("SELECT NULL::text AS missing, true AS flag")
        .await
        .unwrap();
    assert_eq!(results.rows[0][0], NULL);
    assert_eq!(results.rows[0][1], "t");
}

#[tokio::test]
async fn test_empty_result_keeps_columns() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };
    let results = provider
        .execute_query("SELECT 1 AS a, 2 AS b WHERE false")
        .await
        .unwrap();
    assert_eq!(results.columns, ["a", "b"]);
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_statement_without_rows_reports_count() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };
    ensure_fixture(&provider).await;
    let results = provider
        .execute_query(&format!("UPDATE public.{FIXTURE_TABLE} SET label = label WHERE false"))
        .await
        .unwrap();
    assert_eq!(results.columns, ["rows_affected"]);
    assert_eq!(results.rows[0][0], "0");
}

#[tokio::test]
async fn test_invalid_query() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };
    let err = provider
        .execute_query("SELECT * FROM pgpane_nonexistent_table")
        .await
        .unwrap_err();
    let DbError::QueryFailed(message) = err else {
        panic!("expected QueryFailed, got {:?}", err);
    };
    assert!(message.contains("does not exist"), "message: {}", message);
}

#[tokio::test]
async fn test_load_schema_lists_user_tables() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };
    ensure_fixture(&provider).await;
    let snapshot = provider.load_schema().await.unwrap();

    let names: Vec<&str> = snapshot.schemas.iter().map(|s| s.name.as_str()).collect();
    assert!(names.contains(&"public"));
    assert!(!names.contains(&"pg_catalog"));
    assert!(!names.contains(&"information_schema"));
    assert!(snapshot.table_names().contains(&FIXTURE_TABLE.to_string()));
}

#[tokio::test]
async fn test_load_columns_detects_primary_key() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };
    ensure_fixture(&provider).await;
    let columns = provider.load_columns("public", FIXTURE_TABLE).await.unwrap();

    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["id", "label", "price"]);
    assert!(columns[0].is_primary_key);
    assert!(!columns[0].nullable);
    assert!(!columns[1].is_primary_key);
    assert_eq!(columns[2].data_type, "numeric");
    assert!(columns[2].default.is_some());
    assert_eq!(columns[2].ordinal, 3);
}

#[tokio::test]
async fn test_connection_failure() {
    let config = ConnectionConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        ..test_config()
    };
    let result = PostgresProvider::connect(&config).await;
    assert!(matches!(result, Err(DbError::ConnectionFailed(_))));
}
