use serde::{Deserialize, Serialize};

use crate::trial::TrialType;

/// Intents emitted toward the presentation collaborator (rendering,
/// audio). The engine never depends on the outcome of these calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StimulusIntent {
    Present {
        trial_type: TrialType,
        stimulus_index: usize,
    },
    /// Stop cue for inhibition trials (beep / red light).
    SecondaryCue,
    Clear,
}
