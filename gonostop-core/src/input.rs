use serde::{Deserialize, Serialize};

/// Host-supplied input signals for one scheduler tick.
///
/// A host that fails to supply a signal degrades to "nothing observed";
/// a missing movement sample selects the discrete-response stopping rule.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// A discrete response (key press, click, touch) occurred this tick.
    pub responded: bool,
    /// Continuous movement magnitude, for variants that define stopping
    /// as dropping below a movement threshold rather than a key press.
    pub movement: Option<f64>,
}

impl TickInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn response() -> Self {
        Self {
            responded: true,
            movement: None,
        }
    }

    pub fn moving(magnitude: f64) -> Self {
        Self {
            responded: false,
            movement: Some(magnitude),
        }
    }
}
