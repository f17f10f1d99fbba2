//! Distortion / Waveshaping
//!
//! Distortion adds harmonics by reshaping the waveform. Instead of evaluating
//! a transfer function per sample, the shaper looks the output up in a
//! pre-computed table (the "curve") that maps input amplitude in [-1, 1]
//! to output amplitude.
//!
//! # The Curve
//!
//! For a drive amount `k` and table position `x` in [-1, 1):
//!
//!   f(x) = (3 + k) · x · 20° / (π + k · |x|)
//!
//! where 20° = 20 · π/180 radians. The numerator grows linearly with `k`
//! while the denominator grows with `k · |x|`, so small inputs get pushed
//! hard and large inputs flatten out:
//!
//!   k = 0    mild, almost linear slope (≈0.33 at x = 1)
//!   k = 50   noticeable knee near the centre
//!   k = 800  near-square transfer, very aggressive
//!
//! # Oversampling
//!
//! Waveshaping creates harmonics above Nyquist which fold back as aliasing.
//! Running the shaper at 2x or 4x the sample rate and averaging back down
//! keeps more of those harmonics out of the audible band.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Entries in every distortion curve.
pub const CURVE_LEN: usize = 44_100;

/// Drive used when the stored amount is missing or not a number.
pub const DEFAULT_AMOUNT: f32 = 50.0;

const DEG: f32 = PI / 180.0;

/// Oversampling factor for the shaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Oversample {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "2x")]
    X2,
    #[serde(rename = "4x")]
    X4,
}

impl Oversample {
    pub const ALL: [Oversample; 3] = [Oversample::None, Oversample::X2, Oversample::X4];

    pub fn factor(self) -> usize {
        match self {
            Oversample::None => 1,
            Oversample::X2 => 2,
            Oversample::X4 => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Oversample::None => "none",
            Oversample::X2 => "2x",
            Oversample::X4 => "4x",
        }
    }
}

/// Transfer-function lookup table for the distortion stage.
#[derive(Debug, Clone, PartialEq)]
pub struct DistortionCurve {
    amount: f32,
    table: Vec<f32>,
}

impl DistortionCurve {
    /// Build the curve for `amount`. Negative or non-finite amounts use
    /// [`DEFAULT_AMOUNT`].
    pub fn build(amount: f32) -> Self {
        let k = if amount.is_finite() && amount >= 0.0 {
            amount
        } else {
            DEFAULT_AMOUNT
        };

        let table = (0..CURVE_LEN)
            .map(|i| {
                let x = (i as f32 * 2.0) / CURVE_LEN as f32 - 1.0;
                curve_value(k, x)
            })
            .collect();

        Self { amount: k, table }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn table(&self) -> &[f32] {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Look up one input sample, interpolating between table entries.
    /// Inputs outside [-1, 1] hold the end values.
    #[inline]
    pub fn shape(&self, sample: f32) -> f32 {
        let n = self.table.len();
        if n == 0 {
            return sample;
        }
        let last = n - 1;
        let v = last as f32 * (sample + 1.0) * 0.5;

        if !(v > 0.0) {
            // also catches NaN
            return self.table[0];
        }
        if v >= last as f32 {
            return self.table[last];
        }

        let k = v as usize;
        let f = v - k as f32;
        (1.0 - f) * self.table[k] + f * self.table[k + 1]
    }
}

impl Default for DistortionCurve {
    fn default() -> Self {
        Self::build(DEFAULT_AMOUNT)
    }
}

/// Closed form of one curve entry.
#[inline]
pub fn curve_value(amount: f32, x: f32) -> f32 {
    ((3.0 + amount) * x * 20.0 * DEG) / (PI + amount * x.abs())
}

/// Table-driven waveshaper with optional oversampling.
pub struct Waveshaper {
    curve: DistortionCurve,
    oversample: Oversample,
    // Last input sample, for interpolating the upsampled points
    prev: f32,
}

impl Waveshaper {
    pub fn new(curve: DistortionCurve, oversample: Oversample) -> Self {
        Self {
            curve,
            oversample,
            prev: 0.0,
        }
    }

    pub fn curve(&self) -> &DistortionCurve {
        &self.curve
    }

    pub fn oversample(&self) -> Oversample {
        self.oversample
    }

    pub fn set_curve(&mut self, curve: DistortionCurve) {
        self.curve = curve;
    }

    pub fn set_oversample(&mut self, oversample: Oversample) {
        self.oversample = oversample;
    }

    pub fn reset(&mut self) {
        self.prev = 0.0;
    }

    /// Shape a buffer in place.
    pub fn process(&mut self, buffer: &mut [f32]) {
        let factor = self.oversample.factor();

        if factor == 1 {
            for sample in buffer.iter_mut() {
                *sample = self.curve.shape(*sample);
            }
            if let Some(&last) = buffer.last() {
                self.prev = last;
            }
            return;
        }

        let step = 1.0 / factor as f32;
        for sample in buffer.iter_mut() {
            let input = *sample;
            let delta = input - self.prev;
            let mut acc = 0.0f32;
            for k in 1..=factor {
                acc += self.curve.shape(self.prev + delta * (k as f32 * step));
            }
            self.prev = input;
            *sample = acc * step;
        }
    }
}
