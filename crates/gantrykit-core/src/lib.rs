//! # GantryKit Core
//!
//! Core types, errors, and shared state for GantryKit.
//! Provides the jog direction and step model, link state, and the
//! append-only journal consumed by the UI layer.

pub mod data;
pub mod error;
pub mod journal;

pub use data::{Direction, JogStep, LinkState, StepSize};

pub use error::{Error, LinkError, Result, StepParseError, UnknownDirection};

pub use journal::{JogLog, JogLogConfig, LogEntry, LogLevel, LogSubscription};
