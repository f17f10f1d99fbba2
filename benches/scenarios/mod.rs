//! Whole-graph benchmarks.
//!
//! Plan and render the built-in presets through the same path the
//! controller uses.

mod render;

pub use render::{bench_plan, bench_render};
