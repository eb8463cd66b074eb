//! Configuration and settings management for GantryKit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - Connection settings (discovery pattern, baud rate, timeouts)
//! - Jog settings (feedrate, loop interval, failure threshold)
//! - Logging settings (tracing filter, output format, journal size)

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Serial device glob for the current platform
pub fn default_port_pattern() -> String {
    if cfg!(target_os = "windows") {
        "COM*".to_string()
    } else if cfg!(target_os = "macos") {
        "/dev/cu.usbserial*".to_string()
    } else {
        "/dev/ttyUSB*".to_string()
    }
}

/// Connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Glob matched against enumerated serial ports; first lexical match wins
    pub port_pattern: String,
    /// Fixed port, bypassing discovery
    pub port: Option<String>,
    /// Baud rate for the serial link
    pub baud_rate: u32,
    /// Per-command wait for the `ok` line, in milliseconds
    pub read_timeout_ms: u64,
    /// Delay after opening the port before the first command, in milliseconds
    pub startup_delay_ms: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            port_pattern: default_port_pattern(),
            port: None,
            baud_rate: 9600,
            read_timeout_ms: 1000,
            startup_delay_ms: 2000,
        }
    }
}

/// Jog loop settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JogSettings {
    /// Feedrate embedded in every jog command (units/min)
    pub feedrate: u32,
    /// Delay between jog commands while a direction is held, in milliseconds
    pub interval_ms: u64,
    /// Step size at startup
    pub default_step: u32,
    /// Consecutive transport failures tolerated before forcing simulation
    pub max_consecutive_failures: u32,
}

impl Default for JogSettings {
    fn default() -> Self {
        Self {
            feedrate: 10000,
            interval_ms: 100,
            default_step: 1,
            max_consecutive_failures: 3,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default tracing filter directive; `RUST_LOG` takes precedence
    pub level: String,
    /// Emit tracing output as JSON lines
    pub json: bool,
    /// Journal entries retained for snapshots; unset keeps everything
    pub history_limit: Option<usize>,
    /// Buffer per live journal subscriber
    pub channel_capacity: usize,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            history_limit: None,
            channel_capacity: 1024,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionSettings,
    /// Jog settings
    pub jog: JogSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

impl Config {
    /// Default config location: `<config dir>/gantrykit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("gantrykit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load config from file, or fall back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.connection.baud_rate == 0 {
            return Err(SettingsError::invalid("connection.baud_rate", "must be > 0"));
        }

        if self.connection.read_timeout_ms == 0 {
            return Err(SettingsError::invalid(
                "connection.read_timeout_ms",
                "must be > 0",
            ));
        }

        if self.connection.port_pattern.trim().is_empty() {
            return Err(SettingsError::invalid(
                "connection.port_pattern",
                "must not be empty",
            ));
        }

        if self.jog.feedrate == 0 {
            return Err(SettingsError::invalid("jog.feedrate", "must be > 0"));
        }

        if self.jog.interval_ms == 0 {
            return Err(SettingsError::invalid("jog.interval_ms", "must be > 0"));
        }

        if self.jog.default_step == 0 {
            return Err(SettingsError::invalid("jog.default_step", "must be >= 1"));
        }

        if self.logging.channel_capacity == 0 {
            return Err(SettingsError::invalid(
                "logging.channel_capacity",
                "must be > 0",
            ));
        }

        Ok(())
    }
}

enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.connection.baud_rate, 9600);
        assert_eq!(config.connection.read_timeout_ms, 1000);
        assert_eq!(config.jog.feedrate, 10000);
        assert_eq!(config.jog.interval_ms, 100);
        assert_eq!(config.jog.default_step, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.connection.port = Some("/dev/ttyUSB3".to_string());
        config.jog.feedrate = 5000;
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.logging.json = true;
        config.logging.history_limit = Some(500);
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[jog]\ninterval_ms = 50\n").unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.jog.interval_ms, 50);
        assert_eq!(loaded.jog.feedrate, 10000);
        assert_eq!(loaded.connection, ConnectionSettings::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[jog]\nfeedrate = 0\n").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidSetting { ref key, .. } if key == "jog.feedrate"
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let err = Config::default().save_to_file(&path).unwrap_err();
        assert!(matches!(err, SettingsError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
