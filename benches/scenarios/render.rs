//! Benchmarks for planning and rendering preset graphs.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use shatter_dsp::{graph::plan, patch::BuiltinPreset, pipeline};

use crate::BLOCK_SIZES;

pub fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/plan");

    for preset in BuiltinPreset::ALL {
        let params = preset.params();
        group.bench_function(preset.name(), |b| b.iter(|| plan(black_box(&params))));
    }

    group.finish();
}

pub fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/render");
    let sample_rate = 48_000.0;

    // Metallic is the heaviest graph (five extra filters); medium the typical one
    for preset in [BuiltinPreset::Medium, BuiltinPreset::Metallic] {
        let artifacts = pipeline::derive(&preset.params(), sample_rate);

        for &size in BLOCK_SIZES {
            let mut renderer = match artifacts.renderer(sample_rate) {
                Ok(renderer) => renderer,
                Err(err) => panic!("planned graph failed to build: {err}"),
            };
            let mut buffer = vec![0.0f32; size];

            group.bench_with_input(BenchmarkId::new(preset.name(), size), &size, |b, _| {
                b.iter(|| renderer.render_block(black_box(&mut buffer)))
            });
        }
    }

    group.finish();
}
