//! Procedural noise sources rendered into a fixed loop buffer.

/*
Noise Colours
=============

All four kinds start from the same raw material, one uniform draw in
[-1, 1] per sample ("white"), and differ in how much of the previous
output they feed back into the next sample.

  white      sample[i] = white[i]
             Flat spectrum. Every draw independent of the last.

  pink       sample[i] = (white[i] + sample[i-1]) / 2
             A one-pole lowpass over white noise. Softer top end, but only
             an approximation: true pink noise falls 3 dB/octave, this
             falls 6 dB/octave above the pole.

  brown      sample[i] = (white[i] + 0.95 * sample[i-1]) / 2
             Same shape with a slightly leakier integrator.

  metallic   0.5 * white
             + 0.20 * sin(2π · 1200 · t)
             + 0.15 * sin(2π · 2400 · t)
             + 0.10 * sin(2π · 3600 · t)
             + 0.3 * out[i-1] - 0.2 * out[i-2]

             Three fixed partials give it pitch, the two-tap feedback
             rings them, and random "shatter" bursts break it up.


Shatter Bursts
--------------

At every sample a metallic buffer has a 1/1000 chance of starting a
burst: the next 100 samples are replaced by fresh noise under a linear
ramp from full scale down to silence.

    amplitude
      1.0 |\
          |  \
          |    \
      0.0 |______\______
          i      i+100

A burst that starts while another is still running replaces it. Samples
covered by a burst do not use the metallic formula at all, although the
feedback taps keep tracking whatever was written.

Every buffer holds two seconds of audio and is played back looped by the
host.
*/

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of the playback loop in seconds.
pub const LOOP_SECONDS: usize = 2;

const PINK_FEEDBACK: f32 = 1.0;
const BROWN_FEEDBACK: f32 = 0.95;

/// (frequency Hz, weight) of the fixed metallic partials.
pub const METALLIC_PARTIALS: [(f32, f32); 3] = [(1200.0, 0.2), (2400.0, 0.15), (3600.0, 0.1)];
const METALLIC_NOISE_WEIGHT: f32 = 0.5;
const METALLIC_FEEDBACK_1: f32 = 0.3;
const METALLIC_FEEDBACK_2: f32 = -0.2;

/// Per-sample probability that a shatter burst starts.
pub const BURST_PROBABILITY: f64 = 0.001;
/// Samples covered by one shatter burst.
pub const BURST_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    Pink,
    Brown,
    Metallic,
    /// Unknown names in stored presets land here.
    #[default]
    #[serde(other)]
    White,
}

impl NoiseKind {
    pub const ALL: [NoiseKind; 4] = [
        NoiseKind::White,
        NoiseKind::Pink,
        NoiseKind::Brown,
        NoiseKind::Metallic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NoiseKind::White => "white",
            NoiseKind::Pink => "pink",
            NoiseKind::Brown => "brown",
            NoiseKind::Metallic => "metallic",
        }
    }

    /// Parse a kind name. Anything unrecognised is white noise.
    pub fn from_name(name: &str) -> Self {
        match name {
            "pink" => NoiseKind::Pink,
            "brown" => NoiseKind::Brown,
            "metallic" => NoiseKind::Metallic,
            _ => NoiseKind::White,
        }
    }
}

/// Source of the random draws used by the synthesizer.
///
/// Implemented for every [`rand::Rng`]; tests substitute a scripted source
/// so recurrences can be checked sample by sample.
pub trait RandomSource {
    /// Uniform draw in [-1, 1].
    fn bipolar(&mut self) -> f32;

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn bipolar(&mut self) -> f32 {
        self.gen_range(-1.0f32..=1.0)
    }

    #[inline]
    fn chance(&mut self, p: f64) -> bool {
        self.gen_bool(p.clamp(0.0, 1.0))
    }
}

/// A finished block of noise. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseBuffer {
    samples: Vec<f32>,
    sample_rate: f32,
}

impl NoiseBuffer {
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback length in seconds.
    pub fn duration(&self) -> f32 {
        if self.sample_rate > 0.0 {
            self.samples.len() as f32 / self.sample_rate
        } else {
            0.0
        }
    }
}

/// Number of samples in a playback loop.
pub fn loop_len(sample_rate: f32) -> usize {
    LOOP_SECONDS * sample_rate.max(0.0) as usize
}

/// Render `sample_count` samples of `kind` using the thread RNG.
pub fn synthesize(kind: NoiseKind, sample_count: usize, sample_rate: f32) -> NoiseBuffer {
    synthesize_with(kind, sample_count, sample_rate, &mut rand::thread_rng())
}

/// Render a full playback loop (`2 * sample_rate` samples).
pub fn synthesize_loop(kind: NoiseKind, sample_rate: f32) -> NoiseBuffer {
    synthesize(kind, loop_len(sample_rate), sample_rate)
}

pub fn synthesize_with<R: RandomSource + ?Sized>(
    kind: NoiseKind,
    sample_count: usize,
    sample_rate: f32,
    rng: &mut R,
) -> NoiseBuffer {
    let mut samples = vec![0.0f32; sample_count];

    match kind {
        NoiseKind::White => {
            for sample in samples.iter_mut() {
                *sample = rng.bipolar();
            }
        }
        NoiseKind::Pink => smoothed(&mut samples, PINK_FEEDBACK, rng),
        NoiseKind::Brown => smoothed(&mut samples, BROWN_FEEDBACK, rng),
        NoiseKind::Metallic => metallic(&mut samples, sample_rate, rng),
    }

    NoiseBuffer {
        samples,
        sample_rate,
    }
}

/// `out[i] = (white + feedback * out[i-1]) / 2`, starting from silence.
fn smoothed<R: RandomSource + ?Sized>(out: &mut [f32], feedback: f32, rng: &mut R) {
    let mut last = 0.0f32;
    for sample in out.iter_mut() {
        let white = rng.bipolar();
        last = (white + feedback * last) * 0.5;
        *sample = last;
    }
}

fn metallic<R: RandomSource + ?Sized>(out: &mut [f32], sample_rate: f32, rng: &mut R) {
    let mut last = 0.0f32;
    let mut last2 = 0.0f32;
    // Index where the running burst began
    let mut burst_start: Option<usize> = None;
    let inv_rate = if sample_rate > 0.0 { 1.0 / sample_rate } else { 0.0 };

    for (i, sample) in out.iter_mut().enumerate() {
        let white = rng.bipolar();
        let t = i as f32 * inv_rate;

        let partials: f32 = METALLIC_PARTIALS
            .iter()
            .map(|&(freq, weight)| (TAU * freq * t).sin() * weight)
            .sum();

        let mut value = white * METALLIC_NOISE_WEIGHT
            + partials
            + last * METALLIC_FEEDBACK_1
            + last2 * METALLIC_FEEDBACK_2;

        if rng.chance(BURST_PROBABILITY) {
            burst_start = Some(i);
        }

        if let Some(start) = burst_start {
            let j = i - start;
            if j < BURST_LEN {
                value = rng.bipolar() * (1.0 - j as f32 / BURST_LEN as f32);
            } else {
                burst_start = None;
            }
        }

        *sample = value;
        last2 = last;
        last = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    /// Replays a fixed list of draws and never fires a burst unless told to.
    struct Scripted {
        draws: Vec<f32>,
        next: usize,
        bursts_at: Vec<usize>,
        chance_calls: usize,
    }

    impl Scripted {
        fn new(draws: Vec<f32>) -> Self {
            Self {
                draws,
                next: 0,
                bursts_at: Vec::new(),
                chance_calls: 0,
            }
        }

        fn with_bursts(mut self, at: Vec<usize>) -> Self {
            self.bursts_at = at;
            self
        }
    }

    impl RandomSource for Scripted {
        fn bipolar(&mut self) -> f32 {
            let value = self.draws[self.next % self.draws.len()];
            self.next += 1;
            value
        }

        fn chance(&mut self, _p: f64) -> bool {
            let fire = self.bursts_at.contains(&self.chance_calls);
            self.chance_calls += 1;
            fire
        }
    }

    #[test]
    fn white_stays_in_range() {
        let buffer = synthesize(NoiseKind::White, 48_000, 48_000.0);
        assert_eq!(buffer.len(), 48_000);
        for &sample in buffer.samples() {
            assert!(
                (-1.0..=1.0).contains(&sample),
                "white sample {} out of range",
                sample
            );
        }
    }

    #[test]
    fn white_is_uncorrelated() {
        let mut rng = StdRng::seed_from_u64(7);
        let buffer = synthesize_with(NoiseKind::White, 50_000, 48_000.0, &mut rng);
        let s = buffer.samples();

        let mean = s.iter().map(|&x| x as f64).sum::<f64>() / s.len() as f64;
        let var = s.iter().map(|&x| (x as f64 - mean).powi(2)).sum::<f64>();
        let lag1 = s
            .windows(2)
            .map(|w| (w[0] as f64 - mean) * (w[1] as f64 - mean))
            .sum::<f64>();

        assert!(mean.abs() < 0.02, "mean drifted: {}", mean);
        assert!((lag1 / var).abs() < 0.03, "lag-1 correlation {}", lag1 / var);
    }

    #[test]
    fn pink_follows_recurrence() {
        let draws = vec![0.8, -0.4, 0.2, 1.0, -1.0, 0.5];
        let mut rng = Scripted::new(draws.clone());
        let buffer = synthesize_with(NoiseKind::Pink, draws.len(), 48_000.0, &mut rng);
        let s = buffer.samples();

        assert!((s[0] - draws[0] / 2.0).abs() < 1e-6);
        for i in 1..s.len() {
            let expected = (draws[i] + s[i - 1]) / 2.0;
            assert!(
                (s[i] - expected).abs() < 1e-6,
                "pink sample {}: expected {}, got {}",
                i,
                expected,
                s[i]
            );
        }
    }

    #[test]
    fn brown_follows_recurrence() {
        let draws = vec![1.0, 1.0, -0.5, 0.25];
        let mut rng = Scripted::new(draws.clone());
        let buffer = synthesize_with(NoiseKind::Brown, draws.len(), 48_000.0, &mut rng);
        let s = buffer.samples();

        let mut last = 0.0f32;
        for i in 0..s.len() {
            let expected = (draws[i] + 0.95 * last) / 2.0;
            assert!((s[i] - expected).abs() < 1e-6);
            last = expected;
        }
    }

    #[test]
    fn pink_is_smoother_than_white() {
        let mut rng = StdRng::seed_from_u64(3);
        let white = synthesize_with(NoiseKind::White, 20_000, 48_000.0, &mut rng);
        let pink = synthesize_with(NoiseKind::Pink, 20_000, 48_000.0, &mut rng);

        let roughness = |s: &[f32]| {
            s.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<f32>() / s.len() as f32
        };
        assert!(roughness(pink.samples()) < roughness(white.samples()) * 0.8);
    }

    #[test]
    fn metallic_without_bursts_matches_formula() {
        let draws = vec![0.3, -0.6, 0.9, 0.1, -0.2, 0.7, 0.0, -1.0];
        let sample_rate = 48_000.0;
        let mut rng = Scripted::new(draws.clone());
        let buffer = synthesize_with(NoiseKind::Metallic, draws.len(), sample_rate, &mut rng);
        let s = buffer.samples();

        let (mut last, mut last2) = (0.0f32, 0.0f32);
        for i in 0..s.len() {
            let t = i as f32 / sample_rate;
            let expected = draws[i] * 0.5
                + (TAU * 1200.0 * t).sin() * 0.2
                + (TAU * 2400.0 * t).sin() * 0.15
                + (TAU * 3600.0 * t).sin() * 0.1
                + last * 0.3
                - last2 * 0.2;
            assert!(
                (s[i] - expected).abs() < 1e-5,
                "metallic sample {}: expected {}, got {}",
                i,
                expected,
                s[i]
            );
            last2 = last;
            last = expected;
        }
    }

    #[test]
    fn burst_overrides_formula_and_ramps_down() {
        // Every draw is 1.0 so burst samples equal their envelope.
        let mut rng = Scripted::new(vec![1.0]).with_bursts(vec![10]);
        let buffer = synthesize_with(NoiseKind::Metallic, 200, 48_000.0, &mut rng);
        let s = buffer.samples();

        for j in 0..BURST_LEN {
            let expected = 1.0 - j as f32 / BURST_LEN as f32;
            assert!(
                (s[10 + j] - expected).abs() < 1e-6,
                "burst sample {}: expected {}, got {}",
                j,
                expected,
                s[10 + j]
            );
        }
        // Past the window the formula is back in charge, fed by the burst tail
        let i = 10 + BURST_LEN;
        let t = i as f32 / 48_000.0;
        let partials: f32 = METALLIC_PARTIALS
            .iter()
            .map(|&(freq, weight)| (TAU * freq * t).sin() * weight)
            .sum();
        let expected = 0.5 + partials + 0.3 * s[i - 1] - 0.2 * s[i - 2];
        assert!((s[i] - expected).abs() < 1e-5, "{} vs {}", s[i], expected);
    }

    #[test]
    fn burst_truncates_at_buffer_end() {
        let mut rng = Scripted::new(vec![1.0]).with_bursts(vec![45]);
        let buffer = synthesize_with(NoiseKind::Metallic, 50, 48_000.0, &mut rng);
        assert_eq!(buffer.len(), 50);
        assert!((buffer.samples()[45] - 1.0).abs() < 1e-6);
        assert!((buffer.samples()[49] - 0.96).abs() < 1e-6);
    }

    #[test]
    fn retrigger_restarts_the_ramp() {
        let mut rng = Scripted::new(vec![1.0]).with_bursts(vec![0, 50]);
        let buffer = synthesize_with(NoiseKind::Metallic, 200, 48_000.0, &mut rng);
        let s = buffer.samples();

        assert!((s[49] - 0.51).abs() < 1e-6);
        assert!((s[50] - 1.0).abs() < 1e-6, "second burst should restart at full scale");
        assert!((s[149] - 0.01).abs() < 1e-6);
    }

    #[test]
    fn loop_is_two_seconds() {
        let buffer = synthesize_loop(NoiseKind::Brown, 8_000.0);
        assert_eq!(buffer.len(), 16_000);
        assert!((buffer.duration() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_names_fall_back_to_white() {
        assert_eq!(NoiseKind::from_name("violet"), NoiseKind::White);
        assert_eq!(NoiseKind::from_name("metallic"), NoiseKind::Metallic);
        let kind: NoiseKind = serde_json::from_str("\"violet\"").unwrap();
        assert_eq!(kind, NoiseKind::White);
    }

    #[test]
    fn serde_names_match_kind_names() {
        for kind in NoiseKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
            let back: NoiseKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }
}
