use crate::firmware::grbl::build_jog;
use crate::link::SharedLink;
use gantrykit_core::{Direction, Error, JogLog, StepSize};
use gantrykit_settings::JogSettings;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Per-session loop parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Feedrate embedded in every command
    pub feedrate: u32,
    /// Pause between commands
    pub interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&JogSettings::default())
    }
}

impl From<&JogSettings> for SessionConfig {
    fn from(settings: &JogSettings) -> Self {
        Self {
            feedrate: settings.feedrate,
            interval: Duration::from_millis(settings.interval_ms),
        }
    }
}

/// A running jog loop for one held direction
#[derive(Debug)]
pub struct MovementSession {
    direction: Direction,
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl MovementSession {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the loop has neither been released nor exited
    pub fn is_active(&self) -> bool {
        self.running.load(Ordering::SeqCst) && !self.handle.is_finished()
    }

    /// Ask the loop to exit at its next wake
    fn release(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Owns one [`MovementSession`] per held direction
pub struct JogSessionManager {
    sessions: Mutex<HashMap<Direction, MovementSession>>,
    link: SharedLink,
    step: StepSize,
    log: JogLog,
    config: SessionConfig,
    runtime: Handle,
}

impl JogSessionManager {
    pub fn new(
        link: SharedLink,
        step: StepSize,
        log: JogLog,
        config: SessionConfig,
        runtime: Handle,
    ) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            link,
            step,
            log,
            config,
            runtime,
        }
    }

    /// Start jogging in `direction`.
    ///
    /// Returns `false` when a session for it is already running.
    pub fn start(&self, direction: Direction) -> bool {
        let mut sessions = self.sessions.lock();
        if sessions.get(&direction).is_some_and(|s| s.is_active()) {
            tracing::debug!("Jog {} already running", direction);
            return false;
        }

        let running = Arc::new(AtomicBool::new(true));
        let handle = self.runtime.spawn(run_session(
            direction,
            running.clone(),
            self.link.clone(),
            self.step.clone(),
            self.log.clone(),
            self.config,
        ));

        tracing::info!("Started jog {}", direction.label());
        sessions.insert(
            direction,
            MovementSession {
                direction,
                running,
                handle,
            },
        );
        true
    }

    /// Release `direction`; returns `false` if it was not running
    pub fn stop(&self, direction: Direction) -> bool {
        match self.sessions.lock().remove(&direction) {
            Some(session) => {
                session.release();
                tracing::info!("Stopped jog {}", direction.label());
                true
            }
            None => false,
        }
    }

    /// Release every running direction
    pub fn stop_all(&self) {
        for (_, session) in self.sessions.lock().drain() {
            session.release();
        }
    }

    /// Release every direction and wait for the loops to exit
    pub async fn shutdown(&self) {
        let sessions: Vec<MovementSession> =
            self.sessions.lock().drain().map(|(_, s)| s).collect();

        for session in sessions {
            session.release();
            if let Err(e) = session.handle.await {
                tracing::warn!("Jog {} ended abnormally: {}", session.direction, e);
            }
        }
    }

    pub fn is_running(&self, direction: Direction) -> bool {
        self.sessions
            .lock()
            .get(&direction)
            .is_some_and(|s| s.is_active())
    }

    /// Directions currently held, in compass order
    pub fn active_directions(&self) -> Vec<Direction> {
        let sessions = self.sessions.lock();
        Direction::ALL
            .into_iter()
            .filter(|d| sessions.get(d).is_some_and(|s| s.is_active()))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.active_directions().len()
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }
}

impl Drop for JogSessionManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}

async fn run_session(
    direction: Direction,
    running: Arc<AtomicBool>,
    link: SharedLink,
    step: StepSize,
    log: JogLog,
    config: SessionConfig,
) {
    let (dx, dy) = direction.delta();

    while running.load(Ordering::SeqCst) {
        let step = step.get().get();

        if let Some(command) = build_jog(dx, dy, step, config.feedrate) {
            let link = link.clone();
            let sent: gantrykit_core::Result<()> =
                match tokio::task::spawn_blocking(move || link.send(&command)).await {
                    Ok(result) => result.map_err(Error::from),
                    Err(e) => Err(Error::other(format!("send task failed: {}", e))),
                };

            if let Err(e) = sent {
                if e.is_timeout() {
                    tracing::warn!("Jog {} send timed out: {}", direction, e);
                } else {
                    tracing::error!("Jog {} send failed: {}", direction, e);
                }
                log.error(format!("Error sending command: {}", e));
            }
        }

        tokio::time::sleep(config.interval).await;
    }

    tracing::debug!("Jog loop {} exited", direction);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::SimulatedLink;
    use gantrykit_core::JogStep;

    fn manager(log: &JogLog) -> JogSessionManager {
        let link = SharedLink::new(Box::new(SimulatedLink::new(log.clone())), log.clone(), 3);
        JogSessionManager::new(
            link,
            StepSize::new(JogStep::new(1)),
            log.clone(),
            SessionConfig {
                feedrate: 10000,
                interval: Duration::from_millis(20),
            },
            Handle::current(),
        )
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let log = JogLog::new();
        let manager = manager(&log);

        assert!(manager.start(Direction::Up));
        assert!(!manager.start(Direction::Up));
        assert_eq!(manager.active_count(), 1);

        assert!(manager.stop(Direction::Up));
        assert!(!manager.stop(Direction::Up));
        assert!(!manager.is_running(Direction::Up));
    }

    #[tokio::test]
    async fn test_active_directions_in_compass_order() {
        let log = JogLog::new();
        let manager = manager(&log);

        manager.start(Direction::Right);
        manager.start(Direction::UpLeft);
        assert_eq!(
            manager.active_directions(),
            vec![Direction::UpLeft, Direction::Right]
        );

        manager.shutdown().await;
        assert!(manager.active_directions().is_empty());
    }

    #[test]
    fn test_config_from_settings() {
        let config = SessionConfig::default();
        assert_eq!(config.feedrate, 10000);
        assert_eq!(config.interval, Duration::from_millis(100));
    }
}
