//! Jog Controller
//!
//! The surface a UI drives: press and release directions, set the step,
//! reconnect, and watch the jog log. Every method is callable from a
//! non-async UI thread; work runs on the runtime captured at construction.

use super::session::{JogSessionManager, SessionConfig};
use crate::link::{LinkConnector, SharedLink};
use gantrykit_core::{
    Direction, JogLog, JogLogConfig, JogStep, LinkState, LogEntry, LogSubscription, StepSize,
    UnknownDirection,
};
use gantrykit_settings::Config;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub struct JogController {
    sessions: JogSessionManager,
    link: SharedLink,
    step: StepSize,
    log: JogLog,
    connector: Arc<dyn LinkConnector>,
    runtime: Handle,
}

impl JogController {
    /// Build a controller with an offline link; nothing is connected yet
    pub fn new(config: &Config, connector: Arc<dyn LinkConnector>, runtime: Handle) -> Self {
        let log = JogLog::with_config(JogLogConfig {
            channel_capacity: config.logging.channel_capacity,
            history_limit: config.logging.history_limit,
        });
        let link = SharedLink::offline(log.clone(), config.jog.max_consecutive_failures);
        let step = StepSize::new(JogStep::new(config.jog.default_step));
        let sessions = JogSessionManager::new(
            link.clone(),
            step.clone(),
            log.clone(),
            SessionConfig::from(&config.jog),
            runtime.clone(),
        );

        Self {
            sessions,
            link,
            step,
            log,
            connector,
            runtime,
        }
    }

    /// Build a controller on the current runtime and make the first
    /// connection attempt, falling back to simulation
    pub async fn launch(config: &Config, connector: Arc<dyn LinkConnector>) -> Self {
        let controller = Self::new(config, connector, Handle::current());
        controller.reconnect().await;
        controller
    }

    pub fn start_movement(&self, direction: Direction) -> bool {
        self.sessions.start(direction)
    }

    pub fn stop_movement(&self, direction: Direction) -> bool {
        self.sessions.stop(direction)
    }

    /// Start a direction by its UI identifier, e.g. `"upleft"`
    pub fn start_movement_by_id(&self, id: &str) -> Result<bool, UnknownDirection> {
        Ok(self.start_movement(id.parse()?))
    }

    /// Stop a direction by its UI identifier
    pub fn stop_movement_by_id(&self, id: &str) -> Result<bool, UnknownDirection> {
        Ok(self.stop_movement(id.parse()?))
    }

    /// Route a WASD key event; returns the direction it maps to, if any
    pub fn handle_key(&self, key: char, pressed: bool) -> Option<Direction> {
        let direction = Direction::from_key(key)?;
        if pressed {
            self.start_movement(direction);
        } else {
            self.stop_movement(direction);
        }
        Some(direction)
    }

    pub fn stop_all(&self) {
        self.sessions.stop_all();
    }

    /// Set the step from user text; anything but a positive integer means 1
    pub fn set_step(&self, value: &str) -> JogStep {
        let step = self.step.set_from_str(value);
        tracing::debug!("Step size set to {}", step);
        step
    }

    pub fn step(&self) -> JogStep {
        self.step.get()
    }

    /// Close the link and connect again in the background
    pub fn request_reconnect(&self) -> JoinHandle<LinkState> {
        let link = self.link.clone();
        let connector = self.connector.clone();
        self.runtime
            .spawn_blocking(move || link.reconnect(connector.as_ref()))
    }

    /// Reconnect and wait for the outcome
    pub async fn reconnect(&self) -> LinkState {
        match self.request_reconnect().await {
            Ok(state) => state,
            Err(e) => {
                tracing::error!("Reconnect task failed: {}", e);
                self.log.error(format!("Reconnect failed: {}", e));
                self.link.state()
            }
        }
    }

    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    pub fn is_moving(&self, direction: Direction) -> bool {
        self.sessions.is_running(direction)
    }

    pub fn active_directions(&self) -> Vec<Direction> {
        self.sessions.active_directions()
    }

    /// Entries appended from now on.
    ///
    /// Live delivery is lossy: a subscriber more than
    /// `logging.channel_capacity` entries behind skips the overwritten ones.
    /// Recover them from [`JogLog::entries_since`] while the history still
    /// holds them.
    pub fn subscribe_to_log(&self) -> LogSubscription {
        self.log.subscribe()
    }

    pub fn log(&self) -> &JogLog {
        &self.log
    }

    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.log.entries()
    }

    /// Stop every session, wait for the loops, then close the link
    pub async fn shutdown(&self) {
        self.sessions.shutdown().await;

        let link = self.link.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || link.close()).await {
            tracing::warn!("Closing link failed: {}", e);
        }
        tracing::info!("Jog controller shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Link;

    struct NoDevice;

    impl LinkConnector for NoDevice {
        fn pattern(&self) -> String {
            "/dev/ttyUSB*".to_string()
        }

        fn discover(&self) -> Option<String> {
            None
        }

        fn create_link(&self, _port: &str, _log: &JogLog) -> Box<dyn Link> {
            unreachable!("no device to link")
        }
    }

    #[tokio::test]
    async fn test_new_is_offline() {
        let controller =
            JogController::new(&Config::default(), Arc::new(NoDevice), Handle::current());
        assert_eq!(controller.link_state(), LinkState::Disconnected);
        assert_eq!(controller.step().get(), 1);
    }

    #[tokio::test]
    async fn test_keys_and_ids() {
        let controller = JogController::launch(&Config::default(), Arc::new(NoDevice)).await;

        assert_eq!(controller.handle_key('W', true), Some(Direction::Up));
        assert!(controller.is_moving(Direction::Up));
        assert_eq!(controller.handle_key('w', false), Some(Direction::Up));
        assert!(!controller.is_moving(Direction::Up));
        assert_eq!(controller.handle_key('q', true), None);

        assert_eq!(controller.start_movement_by_id("downright"), Ok(true));
        assert!(controller.start_movement_by_id("sideways").is_err());
        controller.shutdown().await;
        assert!(controller.active_directions().is_empty());
    }

    #[tokio::test]
    async fn test_set_step() {
        let controller =
            JogController::new(&Config::default(), Arc::new(NoDevice), Handle::current());
        assert_eq!(controller.set_step("25").get(), 25);
        assert_eq!(controller.set_step("abc").get(), 1);
        assert_eq!(controller.step().get(), 1);
    }
}
