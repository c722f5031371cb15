pub mod input;
pub mod stimulus;
pub mod trial;

pub use input::TickInput;
pub use stimulus::StimulusIntent;
pub use trial::{Classification, TrialOutcome, TrialSpec, TrialType};
