//! GantryKit Settings Crate
//!
//! Handles application configuration: loading, validation, and persistence.

pub mod config;
pub mod error;

pub use config::{default_port_pattern, Config, ConnectionSettings, JogSettings, LoggingSettings};
pub use error::{SettingsError, SettingsResult};
