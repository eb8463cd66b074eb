//! # GantryKit
//!
//! Hold-to-jog control for a two-axis gantry driven by a GRBL board over USB
//! serial. While a direction is held, short relative jog commands stream to
//! the board; with no board attached, commands are recorded in the jog log
//! instead.
//!
//! ## Architecture
//!
//! GantryKit is organized as a workspace with multiple crates:
//!
//! 1. **gantrykit-core** - Directions, step size, link state, errors, jog log
//! 2. **gantrykit-settings** - Configuration file loading and validation
//! 3. **gantrykit-communication** - Serial transport, GRBL protocol, links, jog sessions
//! 4. **gantrykit** - Console binary that wires the crates together

pub mod console;

pub use gantrykit_communication::{
    build_jog, JogController, Link, LinkConnector, SerialConnector, SharedLink, SimulatedLink,
};
pub use gantrykit_core::{
    Direction, Error, JogLog, JogStep, LinkError, LinkState, LogEntry, LogLevel, Result, StepSize,
};
pub use gantrykit_settings::{Config, LoggingSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize tracing from the logging settings
///
/// `RUST_LOG` overrides the configured level. Output goes to stderr so it
/// does not interleave with the console's own output on stdout.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&settings.level))?;

    if settings.json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_thread_names(true)
            .with_line_number(true)
            .pretty();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
