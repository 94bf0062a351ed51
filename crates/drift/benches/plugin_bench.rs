//! Criterion benchmark: one `FixedUpdate` tick of the drift plugin.
//!
//! Builds a headless `TestDrift` app at several particle counts and measures
//! a single scheduled drift step, including ECS overhead.
//!
//! Run with: cargo bench -p drift --bench plugin_bench --features bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use drift::test_harness::TestDrift;
use drift::{DriftConfig, HistoryRetention};

fn bench_plugin_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("plugin_tick");
    group.sample_size(20);
    for &n in &[100usize, 1_000, 5_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut drift = TestDrift::with_config(DriftConfig {
                particles: n,
                horizon_steps: usize::MAX,
                retention: HistoryRetention::Window(1),
                progress_interval: 0,
                ..Default::default()
            });
            b.iter(|| drift.tick(1));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plugin_tick);
criterion_main!(benches);
