//! Low-level DSP primitives used by the engine and the planner.
//!
//! Everything here is plain signal math over `f32` slices. Nothing knows
//! about topologies or presets, so the pieces can be tested (and benched)
//! one at a time.

/// Time-domain window and FFT spectrum for the visualisers.
pub mod analyser;
/// Distortion curve builder and table waveshaper.
pub mod distortion;
/// State-variable filter covering the biquad response types.
pub mod filter;
/// Gain, summing and audio-parameter helpers.
pub mod gain;
/// White / pink / brown / metallic noise loops.
pub mod noise;
/// Sine modulator.
pub mod oscillator;

pub use distortion::{DistortionCurve, Oversample};
pub use filter::FilterType;
pub use noise::{NoiseBuffer, NoiseKind};
