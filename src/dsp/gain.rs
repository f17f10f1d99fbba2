//! Gain, summing and audio-parameter helpers.

/*
Audio Parameters
================

A stage parameter such as a gain or a filter frequency has an intrinsic
value (what the stage was configured with). Any signals routed into the
parameter are ADDED to it:

    effective = intrinsic + Σ connected signals

A tremolo is then just a gain stage whose intrinsic gain is 1.0 with a
scaled LFO connected to it:

    gain(t) = 1.0 + depth · 0.5 · lfo(t)      → swings 1 ± depth/2

and a filter sweep is a filter whose frequency input receives a (much
larger) scaled copy of the same LFO:

    cutoff(t) = cutoff + depth · 1000 · lfo(t)


Sample Rate vs Control Rate
---------------------------

Gains follow their parameter input sample by sample: that's one multiply.
Filter coefficients need a tan() each time the cutoff changes, so the
cutoff is only refreshed every CONTROL_BLOCK samples using the average of
the modulation over that span. At 48 kHz that's an update every 0.67 ms,
far faster than any LFO the toy produces.
*/

/// Samples per filter-coefficient refresh.
pub const CONTROL_BLOCK: usize = 32;

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Multiply by `base + modulation[i]` per sample (in-place).
#[inline]
pub fn apply_modulated_gain(signal: &mut [f32], base: f32, modulation: &[f32]) {
    debug_assert_eq!(signal.len(), modulation.len());

    for (s, &m) in signal.iter_mut().zip(modulation.iter()) {
        *s *= base + m;
    }
}

/// Add signal B into signal A in-place.
///
/// Can exceed [-1.0, +1.0]; the resonator merge relies on that boost.
#[inline]
pub fn sum_in_place(a: &mut [f32], b: &[f32]) {
    debug_assert_eq!(a.len(), b.len());

    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb;
    }
}

/// Average of a modulation signal over a control block.
#[inline]
pub fn block_average(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f32>() / samples.len() as f32
}
