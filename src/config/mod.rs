//! Configuration management
//!
//! Handles loading connection profiles and user settings.

pub mod connections;
pub mod settings;

pub use connections::{
    ConnectionConfig, SslMode, find_connection, load_connections, load_connections_from,
    save_connection, save_connection_to,
};
pub use settings::{Settings, load_settings};
