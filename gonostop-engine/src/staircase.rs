use serde::{Deserialize, Serialize};

use crate::config::StaircaseConfig;

/// One-up/one-down ladder for the secondary-signal delay.
///
/// A successful stop lengthens the delay (harder), a failed stop shortens
/// it (easier), driving stop success toward ~50%, the operating point
/// the inhibition-latency estimate assumes. The value never leaves
/// `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Staircase {
    current: f64,
    step: f64,
    min: f64,
    max: f64,
}

impl Staircase {
    pub fn new(config: &StaircaseConfig) -> Self {
        Self {
            current: config.start_ms,
            step: config.step_ms,
            min: config.min_ms,
            max: config.max_ms,
        }
    }

    /// Current secondary-signal delay for the next inhibition trial.
    pub fn value(&self) -> f64 {
        self.current
    }

    pub fn on_inhibition_success(&mut self) {
        self.current = (self.current + self.step).min(self.max);
    }

    pub fn on_inhibition_failure(&mut self) {
        self.current = (self.current - self.step).max(self.min);
    }
}
