use gonostop_core::{TrialSpec, TrialType};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{BlockConfig, ConfigError, SessionConfig};
use crate::sampling::Bag;

/// Re-shuffle budget for the type run-length constraint.
const SHUFFLE_ATTEMPTS: usize = 80;
/// Redraw budget when a stimulus draw would break the same-stimulus run.
const REDRAW_ATTEMPTS: usize = 10;

/// One block's ordered trial sequence plus planning metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockPlan {
    pub block_index: usize,
    pub specs: Vec<TrialSpec>,
    /// True when no shuffle within the attempt budget satisfied the type
    /// run-length constraint and the last shuffle was accepted as-is.
    pub relaxed: bool,
}

/// Plans every block of a session into one globally ordered spec list.
pub fn plan_session(
    config: &SessionConfig,
    rng: &mut impl Rng,
) -> Result<Vec<BlockPlan>, ConfigError> {
    config.validate()?;
    let mut plans = Vec::with_capacity(config.blocks.len());
    let mut position = 0;
    for (block_index, block) in config.blocks.iter().enumerate() {
        let plan = plan_block(block, block_index, position, rng)?;
        position += plan.specs.len();
        plans.push(plan);
    }
    Ok(plans)
}

/// Builds one block's sequence: exact rounded type counts (primary trials
/// absorb the rounding remainder), bounded-retry shuffling for the type
/// run constraint, and per-type stimulus bags with bounded redraws for
/// the stimulus run constraint.
pub fn plan_block(
    config: &BlockConfig,
    block_index: usize,
    first_position: usize,
    rng: &mut impl Rng,
) -> Result<BlockPlan, ConfigError> {
    config.validate(block_index)?;

    let n = config.trials_per_block;
    let target_primary = (n as f64 * config.primary_ratio).round() as usize;
    let target_inhibition = n - target_primary;

    let mut sequence = vec![TrialType::Primary; target_primary];
    sequence.extend(std::iter::repeat_n(TrialType::Inhibition, target_inhibition));

    let mut relaxed = true;
    for _ in 0..SHUFFLE_ATTEMPTS {
        sequence.shuffle(rng);
        if type_run_ok(&sequence, config.max_same_type_run) {
            relaxed = false;
            break;
        }
    }
    if relaxed {
        warn!(
            block = block_index,
            max_run = config.max_same_type_run,
            attempts = SHUFFLE_ATTEMPTS,
            "type run-length constraint unsatisfied within attempt budget; \
             accepting unconstrained order"
        );
    }

    let mut primary_bag = Bag::new(config.primary_stimuli);
    let mut inhibition_bag = Bag::new(config.inhibition_stimuli);
    let mut last_primary: (Option<usize>, usize) = (None, 0);
    let mut last_inhibition: (Option<usize>, usize) = (None, 0);

    let mut specs = Vec::with_capacity(n);
    for (offset, &trial_type) in sequence.iter().enumerate() {
        let (bag, set_size, last) = match trial_type {
            TrialType::Primary => (&mut primary_bag, config.primary_stimuli, &mut last_primary),
            TrialType::Inhibition => (
                &mut inhibition_bag,
                config.inhibition_stimuli,
                &mut last_inhibition,
            ),
        };

        let mut index = bag.draw(rng);
        if Some(index) == last.0 && last.1 >= config.max_same_stimulus_run {
            for _ in 0..REDRAW_ATTEMPTS {
                let candidate = rng.random_range(0..set_size);
                if candidate != index {
                    index = candidate;
                    break;
                }
            }
        }
        if Some(index) == last.0 {
            last.1 += 1;
        } else {
            *last = (Some(index), 1);
        }

        specs.push(TrialSpec {
            trial_type,
            stimulus_index: index,
            block_index,
            position: first_position + offset,
        });
    }

    Ok(BlockPlan {
        block_index,
        specs,
        relaxed,
    })
}

fn type_run_ok(sequence: &[TrialType], max_run: usize) -> bool {
    let mut run = 0;
    let mut last = None;
    for &t in sequence {
        if Some(t) == last {
            run += 1;
        } else {
            last = Some(t);
            run = 1;
        }
        if run > max_run {
            return false;
        }
    }
    true
}
