//! Database schema snapshot
//!
//! The skeleton delivered by a schema load: database name plus ordered
//! schemas, each with ordered table names. Columns are fetched per table.

/// Schema skeleton for one database
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSnapshot {
    /// Name of the connected database
    pub database: String,
    /// Schemas in display order
    pub schemas: Vec<SchemaEntry>,
}

/// A database schema (namespace) and its tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaEntry {
    pub name: String,
    pub tables: Vec<String>,
}

impl SchemaSnapshot {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            schemas: Vec::new(),
        }
    }

    /// Every table name across all schemas, in schema order
    pub fn table_names(&self) -> Vec<String> {
        self.schemas
            .iter()
            .flat_map(|s| s.tables.iter().cloned())
            .collect()
    }

    pub fn table_count(&self) -> usize {
        self.schemas.iter().map(|s| s.tables.len()).sum()
    }
}
