//! Serial link to a GRBL board
//!
//! Each command is one exchange: write the line, then read response lines
//! until `ok`, an `error:N`, or the read timeout.

use super::Link;
use crate::communication::serial::{open_port, ReadWrite};
use crate::firmware::grbl::{format_alarm, format_error, frame, GrblResponse, ALARM_CLEAR};
use gantrykit_core::{JogLog, LinkError, LinkState};
use gantrykit_settings::ConnectionSettings;
use std::io::ErrorKind;
use std::time::{Duration, Instant};

/// Back-off when the transport reports no data without blocking
const IDLE_READ_BACKOFF: Duration = Duration::from_millis(10);

/// Timing and line settings for a serial link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialLinkSettings {
    pub baud_rate: u32,
    pub read_timeout: Duration,
    pub startup_delay: Duration,
}

impl Default for SerialLinkSettings {
    fn default() -> Self {
        Self::from(&ConnectionSettings::default())
    }
}

impl From<&ConnectionSettings> for SerialLinkSettings {
    fn from(settings: &ConnectionSettings) -> Self {
        Self {
            baud_rate: settings.baud_rate,
            read_timeout: Duration::from_millis(settings.read_timeout_ms),
            startup_delay: Duration::from_millis(settings.startup_delay_ms),
        }
    }
}

/// GRBL over a serial port
pub struct SerialLink {
    port_name: String,
    settings: SerialLinkSettings,
    transport: Option<Box<dyn ReadWrite>>,
    log: JogLog,
    /// Bytes read past the last complete line
    pending: String,
    connected: bool,
}

impl SerialLink {
    /// Create a link that opens `port_name` on connect
    pub fn new(port_name: impl Into<String>, settings: SerialLinkSettings, log: JogLog) -> Self {
        Self {
            port_name: port_name.into(),
            settings,
            transport: None,
            log,
            pending: String::new(),
            connected: false,
        }
    }

    /// Create a link over an already open transport
    pub fn with_transport(
        port_name: impl Into<String>,
        transport: Box<dyn ReadWrite>,
        settings: SerialLinkSettings,
        log: JogLog,
    ) -> Self {
        let mut link = Self::new(port_name, settings, log);
        link.transport = Some(transport);
        link
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    fn exchange(&mut self, command: &str) -> Result<(), LinkError> {
        let transport = self.transport.as_mut().ok_or(LinkError::NotConnected)?;

        // Anything left over belongs to an earlier, finished exchange
        self.pending.clear();

        tracing::debug!("Sending to {}: {}", self.port_name, command);
        transport
            .write_all(frame(command).as_bytes())
            .and_then(|_| transport.flush())
            .map_err(|e| LinkError::WriteFailed {
                reason: e.to_string(),
            })?;

        let deadline = Instant::now() + self.settings.read_timeout;
        let mut buf = [0u8; 256];

        loop {
            while let Some(line) = take_line(&mut self.pending) {
                let Some(response) = GrblResponse::parse(&line) else {
                    continue;
                };
                if response.completes_command() {
                    return match response {
                        GrblResponse::Error(code) => {
                            self.log.error(format!(
                                "GRBL rejected {}: {}",
                                command,
                                format_error(code)
                            ));
                            Err(LinkError::CommandRejected { code })
                        }
                        _ => Ok(()),
                    };
                }
                match response {
                    GrblResponse::Alarm(code) => {
                        tracing::warn!("GRBL alarm on {}: {}", self.port_name, code);
                        self.log.warn(format!("GRBL {}", format_alarm(code)));
                    }
                    other => {
                        self.log.info(format!("GRBL Response: {}", other));
                    }
                }
            }

            if Instant::now() >= deadline {
                let timeout_ms = self.settings.read_timeout.as_millis() as u64;
                tracing::warn!("No ok for {} within {}ms", command, timeout_ms);
                return Err(LinkError::ReadTimeout { timeout_ms });
            }

            match transport.read(&mut buf) {
                Ok(0) => std::thread::sleep(IDLE_READ_BACKOFF),
                Ok(n) => self.pending.push_str(&String::from_utf8_lossy(&buf[..n])),
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                    ) => {}
                Err(e) => {
                    return Err(LinkError::WriteFailed {
                        reason: format!("read failed: {}", e),
                    })
                }
            }
        }
    }
}

/// Pop the first complete line off `pending`, without its terminator
fn take_line(pending: &mut String) -> Option<String> {
    let pos = pending.find('\n')?;
    let line = pending[..pos].trim_end_matches('\r').to_string();
    pending.drain(..=pos);
    Some(line)
}

impl Link for SerialLink {
    fn connect(&mut self) -> Result<(), LinkError> {
        if self.transport.is_none() {
            self.transport = Some(open_port(&self.port_name, self.settings.baud_rate)?);
        }

        // GRBL resets when the port opens
        if !self.settings.startup_delay.is_zero() {
            std::thread::sleep(self.settings.startup_delay);
        }

        match self.exchange(ALARM_CLEAR) {
            Ok(()) => {}
            // The board answered, so it is alive; a rejected unlock is not fatal
            Err(LinkError::CommandRejected { code }) => {
                tracing::warn!("{} rejected on {}: error:{}", ALARM_CLEAR, self.port_name, code);
            }
            Err(e) => {
                self.close();
                return Err(LinkError::ConnectFailed {
                    reason: format!("{} on {} failed: {}", ALARM_CLEAR, self.port_name, e),
                });
            }
        }

        self.connected = true;
        tracing::info!("Serial link up on {}", self.port_name);
        Ok(())
    }

    fn send(&mut self, command: &str) -> Result<(), LinkError> {
        if !self.connected {
            return Err(LinkError::NotConnected);
        }
        self.exchange(command)
    }

    fn close(&mut self) {
        if self.transport.take().is_some() {
            tracing::info!("Closed serial link on {}", self.port_name);
        }
        self.pending.clear();
        self.connected = false;
    }

    fn state(&self) -> LinkState {
        if self.connected {
            LinkState::Connected(self.port_name.clone())
        } else {
            LinkState::Disconnected
        }
    }
}
