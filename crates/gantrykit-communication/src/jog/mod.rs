//! Jog control
//!
//! While a direction is held, a [`MovementSession`] repeatedly sends a short
//! relative jog for it. [`JogSessionManager`] owns the sessions, and
//! [`JogController`] is the surface the UI drives.

mod controller;
mod session;

pub use controller::JogController;
pub use session::{JogSessionManager, MovementSession, SessionConfig};
