//! End-to-end session tests driving the engine tick-by-tick with
//! scripted participants, the way an offline replay host would.

use gonostop::{
    BlockConfig, Classification, SessionConfig, SessionEngine, SessionEvent, StaircaseConfig,
    StimulusIntent, TickInput, TrialType, aggregate,
};

const TICK_MS: f64 = 10.0;

fn config(seed: u64) -> SessionConfig {
    SessionConfig {
        blocks: vec![
            BlockConfig {
                trials_per_block: 16,
                primary_ratio: 0.6,
                primary_window_ms: 800.0,
                post_window_ms: 300.0,
                iti_ms: (200.0, 400.0),
                max_same_type_run: 3,
                ..BlockConfig::default()
            },
            BlockConfig {
                trials_per_block: 12,
                primary_ratio: 0.6,
                primary_window_ms: 800.0,
                post_window_ms: 300.0,
                iti_ms: (200.0, 400.0),
                max_same_type_run: 3,
                ..BlockConfig::default()
            },
        ],
        seed,
        staircase: StaircaseConfig {
            start_ms: 250.0,
            step_ms: 50.0,
            min_ms: 50.0,
            max_ms: 700.0,
        },
        ..SessionConfig::default()
    }
}

/// Presses exactly `rt_ms` after every stimulus onset, never stopping.
struct SteadyPresser {
    rt_ms: f64,
    countdown_ms: Option<f64>,
}

impl SteadyPresser {
    fn new(rt_ms: f64) -> Self {
        Self {
            rt_ms,
            countdown_ms: None,
        }
    }

    fn step(&mut self, intents: &[StimulusIntent]) -> TickInput {
        let mut input = TickInput::idle();
        if let Some(remaining) = self.countdown_ms {
            let remaining = remaining - TICK_MS;
            if remaining <= 0.0 {
                self.countdown_ms = None;
                input = TickInput::response();
            } else {
                self.countdown_ms = Some(remaining);
            }
        }
        for intent in intents {
            if matches!(intent, StimulusIntent::Present { .. }) {
                self.countdown_ms = Some(self.rt_ms);
            }
        }
        input
    }
}

fn run_session(engine: &mut SessionEngine, presser: &mut SteadyPresser) {
    let mut pending: Vec<StimulusIntent> = Vec::new();
    let mut guard = 0;
    loop {
        let input = presser.step(&pending);
        let tick = engine.tick(TICK_MS, &input);
        pending = tick.intents;
        if tick.events.contains(&SessionEvent::SessionComplete) {
            return;
        }
        guard += 1;
        assert!(guard < 200_000, "session never completed");
    }
}

#[test]
fn planned_type_counts_survive_execution() {
    let mut engine = SessionEngine::new(config(21)).unwrap();
    let planned_primary: usize = engine
        .plans()
        .iter()
        .flat_map(|p| p.specs.iter())
        .filter(|s| s.trial_type == TrialType::Primary)
        .count();
    // round(16 * 0.6) + round(12 * 0.6)
    assert_eq!(planned_primary, 17);
    assert!(engine.plans().iter().all(|p| !p.relaxed));

    let mut presser = SteadyPresser::new(400.0);
    run_session(&mut engine, &mut presser);

    assert_eq!(engine.outcomes().len(), 28);
    let executed_primary = engine
        .outcomes()
        .iter()
        .filter(|o| o.trial_type == TrialType::Primary)
        .count();
    assert_eq!(executed_primary, planned_primary);
}

#[test]
fn infeasible_run_bound_relaxes_and_still_executes() {
    // All-primary block with a run bound of two: no arrangement can
    // satisfy it, so the planner must flag the block and carry on.
    let mut cfg = config(31);
    cfg.blocks.truncate(1);
    cfg.blocks[0].trials_per_block = 10;
    cfg.blocks[0].primary_ratio = 1.0;
    cfg.blocks[0].max_same_type_run = 2;

    let mut engine = SessionEngine::new(cfg).unwrap();
    assert!(engine.plans()[0].relaxed);

    let mut presser = SteadyPresser::new(400.0);
    run_session(&mut engine, &mut presser);
    assert_eq!(engine.outcomes().len(), 10);
}

#[test]
fn steady_presser_yields_correct_goes_and_commissions() {
    let mut engine = SessionEngine::new(config(5)).unwrap();
    let mut presser = SteadyPresser::new(400.0);
    run_session(&mut engine, &mut presser);

    for outcome in engine.outcomes() {
        match outcome.trial_type {
            TrialType::Primary => {
                assert_eq!(outcome.classification, Classification::Correct);
                let rt = outcome.latency_ms.unwrap();
                assert!((rt - 400.0).abs() <= TICK_MS);
            }
            TrialType::Inhibition => {
                // The press at 400 ms always lands after the cue.
                assert_eq!(outcome.classification, Classification::StopFailure);
            }
        }
    }

    // Every failure steps the delay down toward its floor.
    let trace = engine.staircase_trace();
    assert_eq!(trace[0], 250.0);
    for pair in trace.windows(2) {
        assert_eq!(pair[1], (pair[0] - 50.0).max(50.0));
    }

    let summary = aggregate(engine.outcomes(), trace, 4, engine.config().max_valid_rt_ms);
    assert_eq!(summary.omission_rate, 0.0);
    assert_eq!(summary.commission_rate, 1.0);
    assert_eq!(summary.stop_success_rate, 0.0);
    assert!((summary.rt_median_ms - 400.0).abs() <= TICK_MS);
    assert!(summary.inhibition_latency_ms > 0.0);
    assert_eq!(summary.vigilance.len(), 4);
    assert_eq!(summary.vigilance_decrement, 0.0);
}

#[test]
fn summary_recomputation_is_byte_identical() {
    let mut engine = SessionEngine::new(config(9)).unwrap();
    let mut presser = SteadyPresser::new(350.0);
    run_session(&mut engine, &mut presser);

    let first = aggregate(engine.outcomes(), engine.staircase_trace(), 4, 2_000.0);
    let second = aggregate(engine.outcomes(), engine.staircase_trace(), 4, 2_000.0);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[test]
fn abort_mid_trial_leaves_a_valid_sparse_summary() {
    let mut engine = SessionEngine::new(config(13)).unwrap();
    let mut presser = SteadyPresser::new(400.0);

    // Complete three trials, then stop partway into the fourth.
    let mut pending: Vec<StimulusIntent> = Vec::new();
    let mut completed = 0;
    while completed < 3 {
        let input = presser.step(&pending);
        let tick = engine.tick(TICK_MS, &input);
        pending = tick.intents;
        completed += tick
            .events
            .iter()
            .filter(|e| matches!(e, SessionEvent::TrialComplete(_)))
            .count();
    }
    let mut in_trial = false;
    while !in_trial {
        let input = presser.step(&pending);
        let tick = engine.tick(TICK_MS, &input);
        in_trial = tick
            .intents
            .iter()
            .any(|i| matches!(i, StimulusIntent::Present { .. }));
        pending = tick.intents;
    }

    let logged = engine.outcomes().len();
    engine.abort();
    assert!(engine.is_halted());
    assert_eq!(engine.outcomes().len(), logged);

    let summary = aggregate(engine.outcomes(), engine.staircase_trace(), 4, 2_000.0);
    assert_eq!(summary.n_trials, logged);
    // Every logged trial carries a final classification; nothing partial.
    assert_eq!(
        summary.primary_trials + summary.inhibition_trials,
        summary.n_trials
    );
}

#[test]
fn deterministic_seed_reproduces_the_whole_session() {
    let run = |seed| {
        let mut engine = SessionEngine::new(config(seed)).unwrap();
        let mut presser = SteadyPresser::new(400.0);
        run_session(&mut engine, &mut presser);
        let summary = aggregate(engine.outcomes(), engine.staircase_trace(), 4, 2_000.0);
        (engine.outcomes().to_vec(), summary)
    };
    let (outcomes_a, summary_a) = run(77);
    let (outcomes_b, summary_b) = run(77);
    assert_eq!(outcomes_a, outcomes_b);
    assert_eq!(
        serde_json::to_vec(&summary_a).unwrap(),
        serde_json::to_vec(&summary_b).unwrap()
    );
}
