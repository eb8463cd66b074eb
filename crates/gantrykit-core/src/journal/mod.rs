//! # Jog Journal
//!
//! The append-only log shared by the serial and simulated links, the jog
//! sessions, and the UI layer.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gantrykit_core::journal::JogLog;
//!
//! let log = JogLog::new();
//! let mut subscription = log.subscribe();
//!
//! log.info("Simulated send: $J=G21G91X1F10000");
//!
//! while let Some(entry) = subscription.next().await {
//!     println!("{}", entry);
//! }
//! ```

mod entry;
mod log;

pub use entry::*;
pub use log::*;
