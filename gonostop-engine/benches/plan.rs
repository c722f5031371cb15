use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use gonostop_engine::config::{BlockConfig, SessionConfig};
use gonostop_engine::plan::plan_session;
use gonostop_engine::sampling::session_rng;

fn config(blocks: usize, trials: usize) -> SessionConfig {
    SessionConfig {
        blocks: vec![
            BlockConfig {
                trials_per_block: trials,
                primary_stimuli: 3,
                inhibition_stimuli: 2,
                ..BlockConfig::default()
            };
            blocks
        ],
        seed: 99,
        ..SessionConfig::default()
    }
}

pub fn bench_plan_session(c: &mut Criterion) {
    let mut g = c.benchmark_group("plan_session");
    g.sample_size(60);

    for (blocks, trials) in [(1usize, 60usize), (3, 60), (3, 180)] {
        let cfg = config(blocks, trials);
        g.bench_function(format!("{blocks}x{trials}"), |b| {
            b.iter_batched(
                || session_rng(cfg.seed),
                |mut rng| {
                    let plans = plan_session(black_box(&cfg), &mut rng).unwrap();
                    black_box(plans)
                },
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

criterion_group!(benches, bench_plan_session);
criterion_main!(benches);
