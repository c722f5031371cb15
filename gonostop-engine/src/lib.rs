pub mod config;
pub mod plan;
pub mod runner;
pub mod sampling;
pub mod session;
pub mod staircase;

pub use config::{BlockConfig, ConfigError, SessionConfig, StaircaseConfig};
pub use plan::{BlockPlan, plan_block, plan_session};
pub use runner::{TrialParams, TrialRunner};
pub use sampling::{Bag, session_rng};
pub use session::{SessionEngine, SessionEvent, SessionTick};
pub use staircase::Staircase;
