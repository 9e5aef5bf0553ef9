//! Database abstraction layer
//!
//! A trait-based seam over the database so the worker can be driven by the
//! real PostgreSQL provider or by a mock in tests.

pub mod postgres;
pub mod provider;
pub mod schema;
pub mod types;

// Re-export main types
pub use provider::Database;
pub use schema::{SchemaEntry, SchemaSnapshot};
pub use types::{ColumnInfo, NULL, ResultSet};
