//! Benchmarks the ramp calculator's hot path — this is the arithmetic that
//! must complete well inside the step-rate interrupt's budget.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slider_motion::{
    ramp::{initial_interval, next_interval, RampPhase},
    Profile,
};

fn benchmark_next_interval(c: &mut Criterion) {
    let c0 = initial_interval(8000.0, 2_000_000.0, Profile::Linear, 65_535.0);

    c.bench_function("next_interval_linear_up", |b| {
        b.iter(|| {
            next_interval(black_box(c0), black_box(100), black_box(RampPhase::Accelerating), black_box(Profile::Linear), black_box(c0))
        })
    });

    c.bench_function("next_interval_quadratic_down", |b| {
        b.iter(|| {
            next_interval(black_box(c0), black_box(1), black_box(RampPhase::Decelerating), black_box(Profile::Quadratic), black_box(c0))
        })
    });

    c.bench_function("initial_interval_linear", |b| {
        b.iter(|| initial_interval(black_box(8000.0), black_box(2_000_000.0), black_box(Profile::Linear), black_box(65_535.0)))
    });
}

criterion_group!(benches, benchmark_next_interval);
criterion_main!(benches);
