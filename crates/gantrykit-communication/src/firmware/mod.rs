//! Firmware protocol support
//!
//! Supported controllers:
//! - GRBL: jog commands and response classification

pub mod grbl;

pub use grbl::GrblResponse;
