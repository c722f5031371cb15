use gonostop_core::{Classification, StimulusIntent, TickInput, TrialOutcome, TrialSpec, TrialType};
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::{ConfigError, SessionConfig};
use crate::plan::{BlockPlan, plan_session};
use crate::runner::{TrialParams, TrialRunner};
use crate::sampling::session_rng;
use crate::staircase::Staircase;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    TrialComplete(Classification),
    SessionComplete,
}

/// Everything produced by one scheduler tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionTick {
    pub intents: Vec<StimulusIntent>,
    pub events: Vec<SessionEvent>,
}

#[derive(Debug)]
enum SchedulerState {
    /// Before the first trial onset.
    Idle,
    /// Cancellable wait between trials.
    Iti { remaining_ms: f64 },
    Trial(TrialRunner),
    Finished { announced: bool },
    Halted,
}

/// Single-threaded cooperative scheduler: plans the session up front,
/// then consumes one `TrialSpec` at a time, advancing the in-flight
/// trial once per host tick. The staircase and the RNG stream are the
/// only state shared across trials.
#[derive(Debug)]
pub struct SessionEngine {
    config: SessionConfig,
    plans: Vec<BlockPlan>,
    cursor: usize,
    total_trials: usize,
    staircase: Staircase,
    rng: StdRng,
    clock_ms: f64,
    state: SchedulerState,
    outcomes: Vec<TrialOutcome>,
    staircase_trace: Vec<f64>,
}

impl SessionEngine {
    /// Validates the configuration and plans every block. Configuration
    /// problems surface here, never during execution.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let mut rng = session_rng(config.seed);
        let plans = plan_session(&config, &mut rng)?;
        let total_trials = plans.iter().map(|p| p.specs.len()).sum();
        let staircase = Staircase::new(&config.staircase);
        info!(
            blocks = plans.len(),
            trials = total_trials,
            seed = config.seed,
            "session planned"
        );
        Ok(Self {
            config,
            plans,
            cursor: 0,
            total_trials,
            staircase,
            rng,
            clock_ms: 0.0,
            state: SchedulerState::Idle,
            outcomes: Vec::with_capacity(total_trials),
            staircase_trace: Vec::new(),
        })
    }

    /// Advances the session by one tick of `elapsed_ms` simulated time.
    pub fn tick(&mut self, elapsed_ms: f64, input: &TickInput) -> SessionTick {
        let mut out = SessionTick::default();
        self.clock_ms += elapsed_ms;

        let state = std::mem::replace(&mut self.state, SchedulerState::Halted);
        self.state = match state {
            SchedulerState::Idle => self.begin_next_trial(&mut out.intents),
            SchedulerState::Iti { remaining_ms } => {
                let remaining = remaining_ms - elapsed_ms;
                if remaining <= 0.0 {
                    self.begin_next_trial(&mut out.intents)
                } else {
                    SchedulerState::Iti {
                        remaining_ms: remaining,
                    }
                }
            }
            SchedulerState::Trial(mut runner) => {
                match runner.tick(elapsed_ms, input, &mut out.intents) {
                    Some(outcome) => {
                        out.events
                            .push(SessionEvent::TrialComplete(outcome.classification));
                        self.record_outcome(outcome);
                        if self.cursor >= self.total_trials {
                            SchedulerState::Finished { announced: false }
                        } else {
                            SchedulerState::Iti {
                                remaining_ms: self.draw_iti(),
                            }
                        }
                    }
                    None => SchedulerState::Trial(runner),
                }
            }
            SchedulerState::Finished { announced } => {
                if !announced {
                    out.events.push(SessionEvent::SessionComplete);
                    info!(trials = self.outcomes.len(), "session complete");
                }
                SchedulerState::Finished { announced: true }
            }
            SchedulerState::Halted => SchedulerState::Halted,
        };
        out
    }

    /// Cooperative abort: the in-flight trial is discarded without being
    /// logged and the scheduler halts. Completed outcomes stay valid.
    /// Returns the intents needed to release the stimulus, if any.
    pub fn abort(&mut self) -> Vec<StimulusIntent> {
        let in_trial = matches!(self.state, SchedulerState::Trial(_));
        if in_trial {
            info!(completed = self.outcomes.len(), "session aborted mid-trial");
        }
        self.state = SchedulerState::Halted;
        if in_trial {
            vec![StimulusIntent::Clear]
        } else {
            Vec::new()
        }
    }

    fn begin_next_trial(&mut self, intents: &mut Vec<StimulusIntent>) -> SchedulerState {
        let Some(spec) = self.spec_at(self.cursor) else {
            return SchedulerState::Finished { announced: false };
        };
        let block = &self.config.blocks[spec.block_index];
        let params = TrialParams {
            primary_window_ms: block.primary_window_ms,
            post_window_ms: block.post_window_ms,
            min_valid_rt_ms: self.config.min_valid_rt_ms,
            stop_success_window_ms: self.config.stop_success_window_ms,
            movement_threshold: self.config.movement_threshold,
            secondary_delay_ms: self.staircase.value(),
        };
        let trial_id = self.cursor + 1;
        self.cursor += 1;
        debug!(
            trial_id,
            block = spec.block_index,
            trial_type = ?spec.trial_type,
            "trial onset"
        );
        SchedulerState::Trial(TrialRunner::start(
            trial_id,
            spec,
            params,
            self.clock_ms,
            intents,
        ))
    }

    fn spec_at(&self, position: usize) -> Option<TrialSpec> {
        let mut index = position;
        for plan in &self.plans {
            if index < plan.specs.len() {
                return Some(plan.specs[index]);
            }
            index -= plan.specs.len();
        }
        None
    }

    fn record_outcome(&mut self, outcome: TrialOutcome) {
        if outcome.trial_type == TrialType::Inhibition {
            if let Some(delay) = outcome.secondary_signal_ms {
                self.staircase_trace.push(delay);
                match outcome.classification {
                    Classification::StopSuccess => self.staircase.on_inhibition_success(),
                    Classification::StopFailure => self.staircase.on_inhibition_failure(),
                    _ => {}
                }
                debug!(
                    delay,
                    next = self.staircase.value(),
                    ?outcome.classification,
                    "staircase updated"
                );
            }
        }
        self.outcomes.push(outcome);
    }

    fn draw_iti(&mut self) -> f64 {
        // The next spec decides which block's ITI range applies.
        let block_index = self
            .spec_at(self.cursor)
            .map(|s| s.block_index)
            .unwrap_or(0);
        let (min, max) = self.config.blocks[block_index].iti_ms;
        if min < max {
            self.rng.random_range(min..=max)
        } else {
            min
        }
    }

    /// Append-only log of completed trials, in execution order.
    pub fn outcomes(&self) -> &[TrialOutcome] {
        &self.outcomes
    }

    /// Secondary-signal delay used at each armed inhibition trial.
    pub fn staircase_trace(&self) -> &[f64] {
        &self.staircase_trace
    }

    pub fn staircase_value(&self) -> f64 {
        self.staircase.value()
    }

    /// Per-block planning metadata, including the `relaxed` flag.
    pub fn plans(&self) -> &[BlockPlan] {
        &self.plans
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SchedulerState::Finished { .. })
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.state, SchedulerState::Halted)
    }
}
