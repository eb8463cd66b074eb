//! # GantryKit Communication
//!
//! Talks to a GRBL-driven gantry over a serial link and runs the jog loops.
//! Falls back to a simulated link, which records commands in the jog log,
//! whenever no device is available.

pub mod communication;
pub mod firmware;
pub mod jog;
pub mod link;

pub use communication::{discover_port, list_port_names, matches_pattern, open_port, pick_port};
pub use firmware::grbl::{build_jog, GrblResponse};
pub use jog::{JogController, JogSessionManager, MovementSession, SessionConfig};
pub use link::{
    establish, try_establish, Link, LinkConnector, NoOpLink, SerialConnector, SerialLink,
    SerialLinkSettings, SharedLink, SimulatedLink,
};
