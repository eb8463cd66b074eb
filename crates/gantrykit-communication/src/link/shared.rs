//! Link shared by all jog sessions
//!
//! One mutex guards the active link for a whole command exchange, so
//! commands from concurrent sessions never interleave on the wire. The
//! current [`LinkState`] is cached separately so readers never wait behind
//! an exchange in flight.

use super::{establish, Link, LinkConnector, NoOpLink, SimulatedLink};
use gantrykit_core::{JogLog, LinkError, LinkState};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

struct SharedLinkInner {
    link: Mutex<Box<dyn Link>>,
    state: RwLock<LinkState>,
    failures: AtomicU32,
    max_failures: u32,
    log: JogLog,
}

/// Cheaply cloneable handle to the active link
#[derive(Clone)]
pub struct SharedLink {
    inner: Arc<SharedLinkInner>,
}

impl SharedLink {
    /// Share `link`, forcing simulation after more than `max_failures`
    /// consecutive transport failures
    pub fn new(link: Box<dyn Link>, log: JogLog, max_failures: u32) -> Self {
        let state = link.state();
        Self {
            inner: Arc::new(SharedLinkInner {
                link: Mutex::new(link),
                state: RwLock::new(state),
                failures: AtomicU32::new(0),
                max_failures,
                log,
            }),
        }
    }

    /// Shared link with nothing behind it yet
    pub fn offline(log: JogLog, max_failures: u32) -> Self {
        Self::new(Box::new(NoOpLink::new()), log, max_failures)
    }

    /// Send one command over the active link.
    ///
    /// Blocks for the full exchange; call from a blocking context.
    pub fn send(&self, command: &str) -> Result<(), LinkError> {
        let mut link = self.inner.link.lock();
        let result = link.send(command);

        match &result {
            Err(e) if e.is_transport_failure() => {
                let failures = self.inner.failures.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::debug!("Transport failure {} on {}: {}", failures, command, e);

                if failures > self.inner.max_failures {
                    link.close();
                    *link = Box::new(SimulatedLink::new(self.inner.log.clone()));
                    self.inner.failures.store(0, Ordering::SeqCst);
                    self.set_state(LinkState::Simulated);

                    tracing::warn!("Forcing simulation after {} consecutive failures", failures);
                    self.inner.log.warn(format!(
                        "Simulation mode enabled after {} consecutive send failures",
                        failures
                    ));
                }
            }
            _ => self.inner.failures.store(0, Ordering::SeqCst),
        }

        result
    }

    /// Swap in a new link, closing the old one
    pub fn replace(&self, new_link: Box<dyn Link>) -> LinkState {
        let mut link = self.inner.link.lock();
        link.close();
        *link = new_link;
        self.install(&**link)
    }

    /// Close the active link and establish a fresh one through `connector`.
    ///
    /// Sessions wait on the link lock for the duration, rather than failing
    /// against a half-closed device.
    pub fn reconnect(&self, connector: &dyn LinkConnector) -> LinkState {
        let mut link = self.inner.link.lock();
        link.close();
        tracing::info!("Reconnecting via {}", connector.pattern());
        *link = establish(connector, &self.inner.log);
        self.install(&**link)
    }

    fn install(&self, link: &dyn Link) -> LinkState {
        let state = link.state();
        self.inner.failures.store(0, Ordering::SeqCst);
        self.set_state(state.clone());
        tracing::info!("Link is now {}", state);
        state
    }

    fn set_state(&self, next: LinkState) {
        let mut state = self.inner.state.write();
        debug_assert!(
            state.can_transition_to(&next),
            "illegal link transition {} -> {}",
            *state,
            next
        );
        if !state.can_transition_to(&next) {
            tracing::error!("Illegal link transition {} -> {}", *state, next);
        }
        *state = next;
    }

    /// Close the active link
    pub fn close(&self) {
        let mut link = self.inner.link.lock();
        link.close();
        self.set_state(link.state());
    }

    pub fn state(&self) -> LinkState {
        self.inner.state.read().clone()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.inner.failures.load(Ordering::SeqCst)
    }

    pub fn max_failures(&self) -> u32 {
        self.inner.max_failures
    }

    pub fn log(&self) -> &JogLog {
        &self.inner.log
    }
}

impl std::fmt::Debug for SharedLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedLink")
            .field("state", &self.state())
            .field("consecutive_failures", &self.consecutive_failures())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        results: Vec<Result<(), LinkError>>,
    }

    impl Link for Scripted {
        fn connect(&mut self) -> Result<(), LinkError> {
            Ok(())
        }

        fn send(&mut self, _command: &str) -> Result<(), LinkError> {
            if self.results.is_empty() {
                Ok(())
            } else {
                self.results.remove(0)
            }
        }

        fn close(&mut self) {}

        fn state(&self) -> LinkState {
            LinkState::Connected("/dev/ttyUSB0".to_string())
        }
    }

    fn timeout() -> Result<(), LinkError> {
        Err(LinkError::ReadTimeout { timeout_ms: 1000 })
    }

    #[test]
    fn test_rejection_resets_failures() {
        let log = JogLog::new();
        let link = Scripted {
            results: vec![
                timeout(),
                timeout(),
                Err(LinkError::CommandRejected { code: 15 }),
                timeout(),
            ],
        };
        let shared = SharedLink::new(Box::new(link), log, 3);

        let _ = shared.send("a");
        let _ = shared.send("b");
        assert_eq!(shared.consecutive_failures(), 2);
        let _ = shared.send("c");
        assert_eq!(shared.consecutive_failures(), 0);
        let _ = shared.send("d");
        assert_eq!(shared.consecutive_failures(), 1);
        assert!(shared.state().is_connected());
    }

    #[test]
    fn test_escalates_past_threshold() {
        let log = JogLog::new();
        let link = Scripted {
            results: vec![timeout(), timeout(), timeout(), timeout()],
        };
        let shared = SharedLink::new(Box::new(link), log.clone(), 3);

        for _ in 0..3 {
            assert!(shared.send("$J=G21G91X1F10000").is_err());
        }
        assert!(shared.state().is_connected());

        assert!(shared.send("$J=G21G91X1F10000").is_err());
        assert_eq!(shared.state(), LinkState::Simulated);
        assert!(log
            .messages()
            .iter()
            .any(|m| m.starts_with("Simulation mode enabled after 4")));

        assert!(shared.send("$J=G21G91X1F10000").is_ok());
    }

    #[test]
    fn test_offline_and_replace() {
        let log = JogLog::new();
        let shared = SharedLink::offline(log.clone(), 3);
        assert_eq!(shared.state(), LinkState::Disconnected);
        assert_eq!(shared.send("$X"), Err(LinkError::NotConnected));

        let state = shared.replace(Box::new(SimulatedLink::new(log)));
        assert_eq!(state, LinkState::Simulated);
        assert_eq!(shared.consecutive_failures(), 0);
    }

    #[test]
    #[should_panic(expected = "illegal link transition")]
    fn test_simulated_cannot_drop_to_offline() {
        let log = JogLog::new();
        let shared = SharedLink::new(Box::new(SimulatedLink::new(log.clone())), log, 3);
        shared.replace(Box::new(NoOpLink::new()));
    }
}
