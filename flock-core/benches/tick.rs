//! Tick throughput for the two neighbor indices.
//!
//! Run with: `cargo bench -p flock-core`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flock_core::{Flock, FlockConfig, FlockParams};

fn config(population_size: usize) -> FlockConfig {
    FlockConfig::new(FlockParams {
        population_size,
        ..FlockParams::default()
    })
    .expect("default parameters are valid")
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for population in [100, 250, 500, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::new("brute_force", population),
            population,
            |b, &n| {
                let mut flock = Flock::initialize(config(n), 1);
                b.iter(|| flock.tick(black_box(1.0 / 60.0)))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("uniform_grid", population),
            population,
            |b, &n| {
                let mut flock = Flock::initialize_with_grid(config(n), 1);
                b.iter(|| flock.tick(black_box(1.0 / 60.0)))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
