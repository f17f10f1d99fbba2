//! Benchmarks for the distortion curve and table waveshaper.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use shatter_dsp::dsp::distortion::{DistortionCurve, Oversample, Waveshaper};

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    // Full 44100-entry table, rebuilt whenever the amount changes
    group.bench_function("curve_build", |b| {
        b.iter(|| DistortionCurve::build(black_box(400.0)))
    });

    for &size in BLOCK_SIZES {
        // Generate a test signal (sine-like values)
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for oversample in Oversample::ALL {
            let mut shaper = Waveshaper::new(DistortionCurve::build(400.0), oversample);
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("shape_{}", oversample.name()), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        shaper.process(black_box(&mut buffer));
                    })
                },
            );
        }
    }

    group.finish();
}
