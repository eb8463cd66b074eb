//! Error handling for GantryKit
//!
//! Provides the error types shared by every layer of the jog subsystem:
//! - Link errors (serial device discovery, open, write, read)
//! - Input errors (step size and direction parsing)
//!
//! All error types use `thiserror` for ergonomic error handling. None of them
//! are fatal: the communication layer turns link failures into a fallback to
//! simulation mode, and input errors are absorbed at the call site.

use thiserror::Error;

/// Link error type
///
/// Represents failures talking to the motion controller over the shared
/// serial link.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// No serial device matched the discovery pattern
    #[error("No serial device found matching {pattern}")]
    PortNotFound {
        /// The discovery pattern that produced no match.
        pattern: String,
    },

    /// The device was found but could not be opened or initialized
    #[error("Failed to connect: {reason}")]
    ConnectFailed {
        /// The reason the connection failed.
        reason: String,
    },

    /// Writing a command to the device failed
    #[error("Write failed: {reason}")]
    WriteFailed {
        /// The reason the write failed.
        reason: String,
    },

    /// No completion line arrived before the per-command timeout
    #[error("No response within {timeout_ms}ms")]
    ReadTimeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The controller answered with an `error:N` line
    #[error("Command rejected with error:{code}")]
    CommandRejected {
        /// The GRBL error code.
        code: u8,
    },

    /// The link has not been connected or was closed
    #[error("Link not connected")]
    NotConnected,
}

impl LinkError {
    /// Whether this failure points at a dead or missing transport.
    ///
    /// Rejected commands prove the device is alive and do not count.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            LinkError::WriteFailed { .. } | LinkError::ReadTimeout { .. } | LinkError::NotConnected
        )
    }
}

/// Step size input could not be parsed as a positive integer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid step size '{input}'")]
pub struct StepParseError {
    /// The rejected input text.
    pub input: String,
}

/// Direction id did not match any of the eight compass directions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown direction '{id}'")]
pub struct UnknownDirection {
    /// The rejected identifier.
    pub id: String,
}

/// Main error type for GantryKit
#[derive(Error, Debug)]
pub enum Error {
    /// Link error
    #[error(transparent)]
    Link(#[from] LinkError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Link(LinkError::ReadTimeout { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_error_display() {
        let err = LinkError::ReadTimeout { timeout_ms: 1000 };
        assert_eq!(err.to_string(), "No response within 1000ms");

        let err = LinkError::ConnectFailed {
            reason: "permission denied".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to connect: permission denied");
    }

    #[test]
    fn test_transport_failure_classification() {
        assert!(LinkError::ReadTimeout { timeout_ms: 1 }.is_transport_failure());
        assert!(LinkError::WriteFailed {
            reason: "broken pipe".to_string()
        }
        .is_transport_failure());
        assert!(!LinkError::CommandRejected { code: 15 }.is_transport_failure());
        assert!(!LinkError::PortNotFound {
            pattern: "/dev/ttyUSB*".to_string()
        }
        .is_transport_failure());
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = LinkError::ReadTimeout { timeout_ms: 5 }.into();
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "No response within 5ms");

        let err = Error::other("send task failed: cancelled");
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "send task failed: cancelled");
    }
}
