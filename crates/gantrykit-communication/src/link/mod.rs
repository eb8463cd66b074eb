//! Links to the motion controller
//!
//! A [`Link`] is either a real serial connection to GRBL or a simulated one
//! that records commands in the jog log. Links are obtained through a
//! [`LinkConnector`], and shared between jog sessions through [`SharedLink`].

mod serial_link;
mod shared;
mod simulated;

pub use serial_link::{SerialLink, SerialLinkSettings};
pub use shared::SharedLink;
pub use simulated::SimulatedLink;

use crate::communication::serial::discover_port;
use gantrykit_core::{JogLog, LinkError, LinkState};
use gantrykit_settings::ConnectionSettings;

/// A connection capable of delivering jog commands
pub trait Link: Send {
    /// Bring the link up; a no-op for links that are always ready
    fn connect(&mut self) -> Result<(), LinkError>;

    /// Deliver one command and wait for it to complete
    fn send(&mut self, command: &str) -> Result<(), LinkError>;

    /// Release the underlying device, if any
    fn close(&mut self);

    /// Current state of this link
    fn state(&self) -> LinkState;
}

/// Source of links: finds the device and builds a link for it
pub trait LinkConnector: Send + Sync {
    /// Discovery pattern, for diagnostics
    fn pattern(&self) -> String;

    /// Find the device to connect to
    fn discover(&self) -> Option<String>;

    /// Build an unconnected link for `port`
    fn create_link(&self, port: &str, log: &JogLog) -> Box<dyn Link>;
}

/// Connector for a GRBL board on a local serial port
#[derive(Debug, Clone, Default)]
pub struct SerialConnector {
    settings: ConnectionSettings,
}

impl SerialConnector {
    pub fn new(settings: ConnectionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }
}

impl LinkConnector for SerialConnector {
    fn pattern(&self) -> String {
        match &self.settings.port {
            Some(port) => port.clone(),
            None => self.settings.port_pattern.clone(),
        }
    }

    fn discover(&self) -> Option<String> {
        if let Some(port) = &self.settings.port {
            return Some(port.clone());
        }
        discover_port(&self.settings.port_pattern)
    }

    fn create_link(&self, port: &str, log: &JogLog) -> Box<dyn Link> {
        Box::new(SerialLink::new(
            port,
            SerialLinkSettings::from(&self.settings),
            log.clone(),
        ))
    }
}

/// Discover and connect a real link, without falling back
pub fn try_establish(
    connector: &dyn LinkConnector,
    log: &JogLog,
) -> Result<Box<dyn Link>, LinkError> {
    let port = connector
        .discover()
        .ok_or_else(|| LinkError::PortNotFound {
            pattern: connector.pattern(),
        })?;

    let mut link = connector.create_link(&port, log);
    link.connect()?;

    tracing::info!("Connected to GRBL on {}", port);
    log.info(format!("Connected to GRBL on {}", port));
    Ok(link)
}

/// Discover and connect a real link, falling back to simulation.
///
/// Never fails: a missing device or a failed connect yields a
/// [`SimulatedLink`], and the reason is recorded in the log.
pub fn establish(connector: &dyn LinkConnector, log: &JogLog) -> Box<dyn Link> {
    match try_establish(connector, log) {
        Ok(link) => link,
        Err(LinkError::PortNotFound { pattern }) => {
            tracing::warn!("No GRBL device matches {}, simulating", pattern);
            log.warn("Simulation mode enabled: No GRBL device found.");
            Box::new(SimulatedLink::new(log.clone()))
        }
        Err(e) => {
            tracing::warn!("GRBL connection failed, simulating: {}", e);
            log.warn(format!("Simulation mode enabled due to error: {}", e));
            Box::new(SimulatedLink::new(log.clone()))
        }
    }
}

/// Placeholder link used before the first connection attempt completes
#[derive(Debug, Default)]
pub struct NoOpLink;

impl NoOpLink {
    pub fn new() -> Self {
        Self
    }
}

impl Link for NoOpLink {
    fn connect(&mut self) -> Result<(), LinkError> {
        Err(LinkError::NotConnected)
    }

    fn send(&mut self, _command: &str) -> Result<(), LinkError> {
        Err(LinkError::NotConnected)
    }

    fn close(&mut self) {}

    fn state(&self) -> LinkState {
        LinkState::Disconnected
    }
}
