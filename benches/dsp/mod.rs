//! Benchmarks for low-level DSP primitives.

mod distortion;
mod filter;
mod noise;

pub use distortion::bench_distortion;
pub use filter::bench_filter;
pub use noise::bench_noise;
