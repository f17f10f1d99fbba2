//! Benchmarks for noise loop synthesis.
//!
//! Runs on the control thread on every rebuild, so the full two-second
//! loop is what matters.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use shatter_dsp::dsp::noise::{loop_len, synthesize_with, NoiseKind};

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");
    let sample_rate = 48_000.0;
    let len = loop_len(sample_rate);

    for kind in NoiseKind::ALL {
        let mut rng = StdRng::seed_from_u64(1);
        group.bench_with_input(BenchmarkId::new("loop", kind.name()), &kind, |b, &kind| {
            b.iter(|| synthesize_with(black_box(kind), black_box(len), sample_rate, &mut rng))
        });
    }

    group.finish();
}
