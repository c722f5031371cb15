//! Adaptive psychomotor trial engine for go/no-go and stop-signal
//! blocks: constrained trial planning, a tick-driven trial state
//! machine, an adaptive secondary-signal staircase, and session-level
//! behavioral metrics.
//!
//! Facade over the workspace crates; hosts drive [`SessionEngine::tick`]
//! from any loop (real-time, test harness, or offline replay) and hand
//! the resulting [`StimulusIntent`]s to their presentation layer.

pub use gonostop_core::{
    Classification, StimulusIntent, TickInput, TrialOutcome, TrialSpec, TrialType,
};
pub use gonostop_engine::{
    BlockConfig, BlockPlan, ConfigError, SessionConfig, SessionEngine, SessionEvent, SessionTick,
    Staircase, StaircaseConfig,
};
pub use gonostop_metrics::{SessionSummary, VigilanceSlice, aggregate};
