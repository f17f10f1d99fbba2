//! Benchmarks for state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use shatter_dsp::dsp::filter::SVFilter;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let sample_rate = 48_000.0;

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let filters = [
            ("lowpass", SVFilter::lowpass(1000.0).with_q(2.0)),
            ("bandpass", SVFilter::bandpass(2000.0).with_q(5.0)),
            ("highpass", SVFilter::highpass(1000.0).with_q(12.0)),
            ("peaking", SVFilter::peaking(2400.0, 10.0, 15.0)),
        ];

        for (name, mut filter) in filters {
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), black_box(sample_rate));
                })
            });
        }

        // Swept cutoff: coefficients recomputed every control block
        let mut filter = SVFilter::bandpass(2000.0).with_q(5.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("bandpass_swept", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                for (i, chunk) in buffer.chunks_mut(32).enumerate() {
                    let cutoff = 2000.0 + 500.0 * (i as f32 * 0.3).sin();
                    filter.render_at(black_box(chunk), cutoff, sample_rate);
                }
            })
        });
    }

    group.finish();
}
