//! Offline session driver: runs a full two-block session against a
//! synthetic participant and prints the summary as JSON. Pass a seed as
//! the first argument for a reproducible run.

use anyhow::{Context, Result};
use gonostop::{
    BlockConfig, SessionConfig, SessionEngine, SessionEvent, StimulusIntent, TickInput, TrialType,
    aggregate,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

const TICK_MS: f64 = 8.0;

/// Scripted participant: presses after a sampled reaction time on every
/// stimulus and manages to cancel the press on roughly half of the
/// secondary cues, which keeps the staircase hunting around its
/// operating point.
struct Participant {
    rng: StdRng,
    pending_press_ms: Option<f64>,
}

impl Participant {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
            pending_press_ms: None,
        }
    }

    fn observe(&mut self, intent: &StimulusIntent) {
        match intent {
            StimulusIntent::Present { .. } => {
                self.pending_press_ms = Some(self.rng.random_range(250.0..650.0));
            }
            StimulusIntent::SecondaryCue => {
                if self.rng.random::<f64>() < 0.5 {
                    self.pending_press_ms = None;
                }
            }
            StimulusIntent::Clear => {
                self.pending_press_ms = None;
            }
        }
    }

    fn input(&mut self, elapsed_ms: f64) -> TickInput {
        if let Some(remaining) = self.pending_press_ms {
            let remaining = remaining - elapsed_ms;
            if remaining <= 0.0 {
                self.pending_press_ms = None;
                return TickInput::response();
            }
            self.pending_press_ms = Some(remaining);
        }
        TickInput::idle()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse().context("seed must be an unsigned integer")?,
        None => 0,
    };

    let config = SessionConfig {
        blocks: vec![
            BlockConfig {
                trials_per_block: 24,
                primary_ratio: 0.75,
                ..BlockConfig::default()
            };
            2
        ],
        seed,
        ..SessionConfig::default()
    };
    let vigilance_slices = config.vigilance_slices;
    let max_valid_rt_ms = config.max_valid_rt_ms;
    let mut engine = SessionEngine::new(config)?;
    let mut participant = Participant::new(seed);

    let mut complete = false;
    while !complete {
        let input = participant.input(TICK_MS);
        let tick = engine.tick(TICK_MS, &input);
        for intent in &tick.intents {
            participant.observe(intent);
        }
        for event in &tick.events {
            match event {
                SessionEvent::TrialComplete(classification) => {
                    debug!(?classification, "trial complete")
                }
                SessionEvent::SessionComplete => complete = true,
            }
        }
    }

    let stops = engine
        .outcomes()
        .iter()
        .filter(|o| o.trial_type == TrialType::Inhibition)
        .count();
    info!(
        trials = engine.outcomes().len(),
        stops,
        elapsed_s = engine.clock_ms() / 1_000.0,
        "simulated session finished"
    );

    let summary = aggregate(
        engine.outcomes(),
        engine.staircase_trace(),
        vigilance_slices,
        max_valid_rt_ms,
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
