//! Log entry definitions for the jog journal.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Normal operation: sent commands, device chatter, state changes
    #[default]
    Info,
    /// Degraded operation, e.g. falling back to simulation
    Warning,
    /// A command or connection attempt failed
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// A single appended journal line. Entries are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Arrival order, starting at 0
    pub sequence: u64,
    /// Wall-clock time of the append
    pub timestamp: DateTime<Local>,
    /// Severity
    pub level: LogLevel,
    /// Message text
    pub message: String,
}

impl LogEntry {
    pub(crate) fn new(sequence: u64, level: LogLevel, message: String) -> Self {
        Self {
            sequence,
            timestamp: Local::now(),
            level,
            message,
        }
    }

    /// Format for a console or debug text box
    pub fn display_line(&self) -> String {
        format!(
            "[{}] {:<5} {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.level,
            self.message
        )
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_line())
    }
}
