use super::Link;
use gantrykit_core::{JogLog, LinkError, LinkState};

/// Link that records commands in the jog log instead of transmitting them
#[derive(Debug, Clone)]
pub struct SimulatedLink {
    log: JogLog,
}

impl SimulatedLink {
    pub fn new(log: JogLog) -> Self {
        Self { log }
    }
}

impl Link for SimulatedLink {
    fn connect(&mut self) -> Result<(), LinkError> {
        Ok(())
    }

    fn send(&mut self, command: &str) -> Result<(), LinkError> {
        tracing::debug!("Simulated send: {}", command);
        self.log.info(format!("Simulated send: {}", command));
        Ok(())
    }

    fn close(&mut self) {}

    fn state(&self) -> LinkState {
        LinkState::Simulated
    }
}
