//! Orbit computation benchmarks.
//!
//! Run with: cargo bench --bench orbit_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use orrery::prelude::*;

fn bench_kepler_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("kepler_solver");
    group.sample_size(20);

    let times = linspace(1.0, 800.0, 800);
    for (name, period, ecc) in [("Earth", 1.0, 0.02), ("Pluto", 248.348, 0.25)] {
        group.bench_with_input(BenchmarkId::new("angles_for_times", name), &period, |b, &p| {
            b.iter(|| angles_for_times(black_box(times.as_slice()), p, ecc, 0.0));
        });
    }

    group.finish();
}

fn bench_sampling(c: &mut Criterion) {
    let registry = BodyRegistry::solar_system();
    let mut group = c.benchmark_group("sampling");

    if let Ok(pluto) = registry.get("Pluto") {
        for want_3d in [false, true] {
            group.bench_with_input(BenchmarkId::new("orbit_path", want_3d), &want_3d, |b, &d| {
                b.iter(|| orbit_path(black_box(pluto), d));
            });
        }
    }

    if let Ok(pair) = registry.resolve(&["Venus", "Earth"]) {
        group.bench_function("spirograph", |b| b.iter(|| spirograph(black_box(pair.as_slice()))));
    }

    group.finish();
}

criterion_group!(benches, bench_kepler_solver, bench_sampling);
criterion_main!(benches);
