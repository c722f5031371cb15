pub mod aggregate;
pub mod stats;

pub use aggregate::{SessionSummary, VigilanceSlice, aggregate};
pub use stats::{coefficient_of_variation, mean, median, std_dev};
