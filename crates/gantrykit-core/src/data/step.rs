//! Jog step size
//!
//! The step is a positive distance in device units. It is written rarely (from
//! a text input) and read by every jog loop iteration, so the shared cell is a
//! plain atomic.

use crate::error::StepParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A jog step distance, always at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct JogStep(u32);

impl JogStep {
    /// Smallest (and fallback) step
    pub const MIN: JogStep = JogStep(1);

    /// Create a step, clamping zero up to 1
    pub fn new(value: u32) -> Self {
        Self(value.max(1))
    }

    /// Get the raw distance
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Parse user input, falling back to 1 on any failure
    pub fn parse_lossy(input: &str) -> Self {
        match input.parse::<JogStep>() {
            Ok(step) => step,
            Err(e) => {
                tracing::debug!("{}, resetting step to 1", e);
                JogStep::MIN
            }
        }
    }
}

impl Default for JogStep {
    fn default() -> Self {
        JogStep::MIN
    }
}

impl From<u32> for JogStep {
    fn from(value: u32) -> Self {
        JogStep::new(value)
    }
}

impl From<JogStep> for u32 {
    fn from(step: JogStep) -> Self {
        step.0
    }
}

impl fmt::Display for JogStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JogStep {
    type Err = StepParseError;

    /// Accepts any integer; values below 1 clamp to 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = trimmed.parse::<i64>().map_err(|_| StepParseError {
            input: s.to_string(),
        })?;
        let clamped = value.clamp(1, u32::MAX as i64) as u32;
        Ok(JogStep(clamped))
    }
}

/// Shared, thread-safe jog step
///
/// Clones share the same underlying value.
#[derive(Debug, Clone)]
pub struct StepSize {
    value: Arc<AtomicU32>,
}

impl StepSize {
    /// Create a shared step with an initial value
    pub fn new(initial: JogStep) -> Self {
        Self {
            value: Arc::new(AtomicU32::new(initial.get())),
        }
    }

    /// Read the current step
    pub fn get(&self) -> JogStep {
        JogStep::new(self.value.load(Ordering::Acquire))
    }

    /// Replace the current step
    pub fn set(&self, step: JogStep) {
        self.value.store(step.get(), Ordering::Release);
    }

    /// Set the step from text input.
    ///
    /// Unparsable input resets the step to 1; the error never reaches the
    /// caller. Returns the step now in effect.
    pub fn set_from_str(&self, input: &str) -> JogStep {
        let step = JogStep::parse_lossy(input);
        self.set(step);
        step
    }
}

impl Default for StepSize {
    fn default() -> Self {
        Self::new(JogStep::default())
    }
}
