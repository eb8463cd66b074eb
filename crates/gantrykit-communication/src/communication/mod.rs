//! Transport layer for the gantry controller
//!
//! Only a USB serial transport exists; links in `crate::link` build the
//! GRBL exchange on top of it.

pub mod serial;

pub use serial::{discover_port, list_port_names, matches_pattern, open_port, pick_port, ReadWrite};
