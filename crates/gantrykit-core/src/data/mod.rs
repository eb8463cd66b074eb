//! Data models for jog control
//!
//! This module provides:
//! - The eight compass jog directions and their axis deltas
//! - Jog step size, both as a value and as a shared atomic cell
//! - Link state tracking (disconnected, connected, simulated)

pub mod direction;
pub mod step;

pub use direction::Direction;
pub use step::{JogStep, StepSize};

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of the link to the motion controller
///
/// Exactly one variant holds at a time, so a link can never be connected to
/// hardware and simulated at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LinkState {
    /// No transport is open
    #[default]
    Disconnected,
    /// A serial device is open on the named port
    Connected(String),
    /// Commands are recorded to the log instead of transmitted
    Simulated,
}

impl LinkState {
    /// Whether commands reach real hardware
    pub fn is_connected(&self) -> bool {
        matches!(self, LinkState::Connected(_))
    }

    /// Whether the link is in simulation mode
    pub fn is_simulated(&self) -> bool {
        matches!(self, LinkState::Simulated)
    }

    /// Port name when connected
    pub fn port_name(&self) -> Option<&str> {
        match self {
            LinkState::Connected(port) => Some(port),
            _ => None,
        }
    }

    /// Check whether moving from this state to `next` is a legal transition.
    ///
    /// Any state may become connected or simulated, and re-establishing the
    /// same state is allowed. Only a connected link can be closed back to
    /// `Disconnected`: a simulated link has nothing to release.
    pub fn can_transition_to(&self, next: &LinkState) -> bool {
        match (self, next) {
            (_, LinkState::Connected(_)) | (_, LinkState::Simulated) => true,
            (LinkState::Disconnected, LinkState::Disconnected) => true,
            (LinkState::Connected(_), LinkState::Disconnected) => true,
            (LinkState::Simulated, LinkState::Disconnected) => false,
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkState::Disconnected => write!(f, "Disconnected"),
            LinkState::Connected(port) => write!(f, "Connected ({})", port),
            LinkState::Simulated => write!(f, "Simulated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_state_defaults_to_disconnected() {
        assert_eq!(LinkState::default(), LinkState::Disconnected);
        assert!(!LinkState::default().is_connected());
        assert!(!LinkState::default().is_simulated());
    }

    #[test]
    fn test_link_state_port_name() {
        let state = LinkState::Connected("/dev/ttyUSB0".to_string());
        assert_eq!(state.port_name(), Some("/dev/ttyUSB0"));
        assert_eq!(LinkState::Simulated.port_name(), None);
        assert_eq!(state.to_string(), "Connected (/dev/ttyUSB0)");
    }

    #[test]
    fn test_link_state_transitions() {
        let connected = LinkState::Connected("COM3".to_string());
        assert!(LinkState::Disconnected.can_transition_to(&connected));
        assert!(LinkState::Disconnected.can_transition_to(&LinkState::Simulated));
        assert!(connected.can_transition_to(&LinkState::Simulated));
        assert!(LinkState::Simulated.can_transition_to(&connected));
        assert!(connected.can_transition_to(&LinkState::Disconnected));
        assert!(LinkState::Simulated.can_transition_to(&LinkState::Simulated));
    }

    #[test]
    fn test_simulated_cannot_close_to_disconnected() {
        let states = [
            LinkState::Disconnected,
            LinkState::Connected("a".to_string()),
            LinkState::Simulated,
        ];
        let rejected: Vec<(&LinkState, &LinkState)> = states
            .iter()
            .flat_map(|from| states.iter().map(move |to| (from, to)))
            .filter(|(from, to)| !from.can_transition_to(to))
            .collect();
        assert_eq!(rejected, vec![(&LinkState::Simulated, &LinkState::Disconnected)]);
    }
}
