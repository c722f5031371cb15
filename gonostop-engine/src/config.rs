use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration problems detected at planning time. These are fatal to
/// starting a block and never silently corrected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("session has no blocks")]
    NoBlocks,
    #[error("block {block}: trials_per_block must be at least 1")]
    NoTrials { block: usize },
    #[error("block {block}: primary_ratio {ratio} outside [0, 1]")]
    RatioOutOfRange { block: usize, ratio: f64 },
    #[error("block {block}: {kind} stimulus set is empty")]
    EmptyStimulusSet { block: usize, kind: &'static str },
    #[error("block {block}: inter-trial interval {min}..{max} ms is inverted")]
    InvalidItiRange { block: usize, min: f64, max: f64 },
    #[error("staircase bounds {min}..{max} ms are inverted")]
    InvalidStaircaseBounds { min: f64, max: f64 },
    #[error("staircase start {start} ms outside bounds {min}..{max}")]
    StaircaseStartOutOfBounds { start: f64, min: f64, max: f64 },
    #[error("response-validity window {min}..{max} ms is inverted")]
    InvalidRtWindow { min: f64, max: f64 },
    #[error("vigilance_slices must be at least 1")]
    NoVigilanceSlices,
}

/// Static parameters of one experimental block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockConfig {
    pub trials_per_block: usize,
    /// Number of stimulus variants available for primary trials.
    pub primary_stimuli: usize,
    /// Number of stimulus variants available for inhibition trials.
    pub inhibition_stimuli: usize,
    /// Fraction of primary trials, typically 0.8 (4:1).
    pub primary_ratio: f64,
    pub primary_window_ms: f64,
    /// Extra window after stimulus offset in which late responses still
    /// count on primary trials. Zero disables it.
    pub post_window_ms: f64,
    /// Inter-trial interval bounds; each wait is drawn uniformly.
    pub iti_ms: (f64, f64),
    pub max_same_type_run: usize,
    pub max_same_stimulus_run: usize,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            trials_per_block: 60,
            primary_stimuli: 1,
            inhibition_stimuli: 1,
            primary_ratio: 0.8,
            primary_window_ms: 1200.0,
            post_window_ms: 300.0,
            iti_ms: (900.0, 1400.0),
            max_same_type_run: 2,
            max_same_stimulus_run: 2,
        }
    }
}

impl BlockConfig {
    pub fn validate(&self, block: usize) -> Result<(), ConfigError> {
        if self.trials_per_block < 1 {
            return Err(ConfigError::NoTrials { block });
        }
        if !(0.0..=1.0).contains(&self.primary_ratio) {
            return Err(ConfigError::RatioOutOfRange {
                block,
                ratio: self.primary_ratio,
            });
        }
        if self.primary_stimuli == 0 {
            return Err(ConfigError::EmptyStimulusSet {
                block,
                kind: "primary",
            });
        }
        if self.inhibition_stimuli == 0 {
            return Err(ConfigError::EmptyStimulusSet {
                block,
                kind: "inhibition",
            });
        }
        if self.iti_ms.0 > self.iti_ms.1 {
            return Err(ConfigError::InvalidItiRange {
                block,
                min: self.iti_ms.0,
                max: self.iti_ms.1,
            });
        }
        Ok(())
    }
}

/// Adaptive secondary-signal delay parameters, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaircaseConfig {
    pub start_ms: f64,
    pub step_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl Default for StaircaseConfig {
    fn default() -> Self {
        Self {
            start_ms: 250.0,
            step_ms: 50.0,
            min_ms: 50.0,
            max_ms: 700.0,
        }
    }
}

impl StaircaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_ms > self.max_ms {
            return Err(ConfigError::InvalidStaircaseBounds {
                min: self.min_ms,
                max: self.max_ms,
            });
        }
        if !(self.min_ms..=self.max_ms).contains(&self.start_ms) {
            return Err(ConfigError::StaircaseStartOutOfBounds {
                start: self.start_ms,
                min: self.min_ms,
                max: self.max_ms,
            });
        }
        Ok(())
    }
}

/// Full configuration surface of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub blocks: Vec<BlockConfig>,
    /// 0 means fresh entropy per session; anything else is deterministic.
    pub seed: u64,
    /// Responses faster than this are anticipations, not reactions.
    pub min_valid_rt_ms: f64,
    /// Latencies above this are kept in the log but excluded from the
    /// reaction-time statistics.
    pub max_valid_rt_ms: f64,
    pub stop_success_window_ms: f64,
    /// Movement magnitude at or below which the participant counts as
    /// stopped, for movement-based variants.
    pub movement_threshold: f64,
    pub staircase: StaircaseConfig,
    /// Slice count for the temporal vigilance profile.
    pub vigilance_slices: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            blocks: vec![BlockConfig::default()],
            seed: 0,
            min_valid_rt_ms: 150.0,
            max_valid_rt_ms: 2000.0,
            stop_success_window_ms: 800.0,
            movement_threshold: 0.10,
            staircase: StaircaseConfig::default(),
            vigilance_slices: 4,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blocks.is_empty() {
            return Err(ConfigError::NoBlocks);
        }
        for (i, block) in self.blocks.iter().enumerate() {
            block.validate(i)?;
        }
        self.staircase.validate()?;
        if self.min_valid_rt_ms > self.max_valid_rt_ms {
            return Err(ConfigError::InvalidRtWindow {
                min: self.min_valid_rt_ms,
                max: self.max_valid_rt_ms,
            });
        }
        if self.vigilance_slices == 0 {
            return Err(ConfigError::NoVigilanceSlices);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SessionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_trials() {
        let mut cfg = SessionConfig::default();
        cfg.blocks[0].trials_per_block = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::NoTrials { block: 0 }));
    }

    #[test]
    fn rejects_ratio_outside_unit_interval() {
        let mut cfg = SessionConfig::default();
        cfg.blocks[0].primary_ratio = 1.2;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RatioOutOfRange { block: 0, .. })
        ));
    }

    #[test]
    fn rejects_empty_stimulus_set() {
        let mut cfg = SessionConfig::default();
        cfg.blocks[0].inhibition_stimuli = 0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::EmptyStimulusSet {
                block: 0,
                kind: "inhibition"
            })
        );
    }

    #[test]
    fn rejects_staircase_start_outside_bounds() {
        let mut cfg = SessionConfig::default();
        cfg.staircase.start_ms = 20.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::StaircaseStartOutOfBounds { .. })
        ));
    }

    #[test]
    fn rejects_inverted_rt_window() {
        let mut cfg = SessionConfig::default();
        cfg.max_valid_rt_ms = 100.0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidRtWindow {
                min: 150.0,
                max: 100.0
            })
        );
    }

    #[test]
    fn rejects_empty_session() {
        let cfg = SessionConfig {
            blocks: Vec::new(),
            ..SessionConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoBlocks));
    }
}
