//! Serial port communication implementation
//!
//! Provides low-level serial port operations for the direct USB connection
//! to the gantry's GRBL controller.
//!
//! Supports:
//! - Port enumeration and discovery by glob pattern
//! - Opening a port with a short poll timeout for line-oriented reads

use gantrykit_core::LinkError;
use std::time::Duration;

/// Poll timeout for a single blocking read on an open port.
///
/// Kept short so the per-command deadline is checked often.
pub const READ_POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Trait for serial port I/O operations
pub trait ReadWrite: std::io::Read + std::io::Write + Send {}
impl<T: std::io::Read + std::io::Write + Send> ReadWrite for T {}

/// List the names of all serial ports on the system
pub fn list_port_names() -> Result<Vec<String>, LinkError> {
    match serialport::available_ports() {
        Ok(ports) => Ok(ports.into_iter().map(|port| port.port_name).collect()),
        Err(e) => {
            tracing::error!("Failed to enumerate serial ports: {}", e);
            Err(LinkError::ConnectFailed {
                reason: format!("Failed to enumerate ports: {}", e),
            })
        }
    }
}

/// Pick the first port name, in lexical order, that matches `pattern`
pub fn pick_port<I>(port_names: I, pattern: &str) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    port_names
        .into_iter()
        .filter(|name| matches_pattern(name, pattern))
        .min()
}

/// Discover the gantry controller's port on this machine
pub fn discover_port(pattern: &str) -> Option<String> {
    let names = match list_port_names() {
        Ok(names) => names,
        Err(_) => return None,
    };
    let port = pick_port(names, pattern);
    match &port {
        Some(name) => tracing::debug!("Discovered serial port {} for {}", name, pattern),
        None => tracing::debug!("No serial port matches {}", pattern),
    }
    port
}

/// Check a port name against a glob pattern.
///
/// `*` matches any run of characters and `?` matches exactly one.
pub fn matches_pattern(port_name: &str, pattern: &str) -> bool {
    let name: Vec<char> = port_name.chars().collect();
    let pat: Vec<char> = pattern.chars().collect();

    let (mut n, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        if p < pat.len() && (pat[p] == '?' || pat[p] == name[n]) {
            n += 1;
            p += 1;
        } else if p < pat.len() && pat[p] == '*' {
            backtrack = Some((p, n));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            n = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pat[p..].iter().all(|&c| c == '*')
}

/// Open a serial port for line-oriented GRBL traffic
pub fn open_port(port_name: &str, baud_rate: u32) -> Result<Box<dyn ReadWrite>, LinkError> {
    let builder = serialport::new(port_name, baud_rate)
        .timeout(READ_POLL_TIMEOUT)
        .data_bits(serialport::DataBits::Eight)
        .stop_bits(serialport::StopBits::One)
        .parity(serialport::Parity::None)
        .flow_control(serialport::FlowControl::None);

    match builder.open() {
        Ok(port) => Ok(Box::new(port)),
        Err(e) => {
            tracing::warn!("Failed to open serial port {}: {}", port_name, e);
            Err(LinkError::ConnectFailed {
                reason: format!("Failed to open port {}: {}", port_name, e),
            })
        }
    }
}
