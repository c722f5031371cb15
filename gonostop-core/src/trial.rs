use serde::{Deserialize, Serialize};

/// The two trial families sharing one runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialType {
    /// Requires a response within the response window ("go").
    Primary,
    /// Requires withholding the response after a delayed secondary cue ("stop").
    Inhibition,
}

impl TrialType {
    pub fn is_inhibition(self) -> bool {
        matches!(self, TrialType::Inhibition)
    }
}

/// A planned, not-yet-executed trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSpec {
    pub trial_type: TrialType,
    /// Index into the stimulus set for this trial's type.
    pub stimulus_index: usize,
    pub block_index: usize,
    /// Ordinal position across the whole session plan.
    pub position: usize,
}

/// Final verdict for one executed trial. Exactly one is assigned per
/// outcome; the set is exhaustive for each trial type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Correct,
    Omission,
    /// Response landed before the minimum valid reaction time; never
    /// counted as a genuine reaction.
    Anticipation,
    StopSuccess,
    /// Failed to withhold after the secondary cue (commission).
    StopFailure,
}

/// Recorded result per trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub trial_id: usize,
    pub block_index: usize,
    pub trial_type: TrialType,
    pub stimulus_index: usize,
    /// Onset offset in milliseconds since session start.
    pub onset_ms: f64,
    pub responded: bool,
    /// Valid-response latency; `None` for omissions and anticipations.
    pub latency_ms: Option<f64>,
    /// Delay at which the secondary cue was presented; `None` when the
    /// cue was never armed (also for every primary trial).
    pub secondary_signal_ms: Option<f64>,
    pub classification: Classification,
}

impl TrialOutcome {
    /// Inhibition trial whose secondary cue was actually presented.
    /// Only these enter commission / stop-success statistics.
    pub fn is_armed_inhibition(&self) -> bool {
        self.trial_type.is_inhibition() && self.secondary_signal_ms.is_some()
    }
}
