use std::f32::consts::{FRAC_1_SQRT_2, PI};

use serde::{Deserialize, Serialize};

/*
| type      | output                         | passes           | rejects          |
| --------- | ------------------------------ | ---------------- | ---------------- |
| lowpass   | v2                             | below cutoff     | above cutoff     |
| highpass  | v0 - k·v1 - v2                 | above cutoff     | below cutoff     |
| bandpass  | k·v1                           | around cutoff    | both sides       |
| notch     | v0 - k·v1                      | outside cutoff   | at cutoff        |
| allpass   | v0 - 2k·v1                     | everything       | nothing (phase)  |
| peaking   | v0 + k(A²-1)·v1                | all, boosts band |                  |
| lowshelf  | v0 + k(A-1)·v1 + (A²-1)·v2     | all, boosts lows |                  |
| highshelf | A²v0 + kA(1-A)·v1 + (1-A²)·v2  | all, boosts highs|                  |

All eight come from the same two-integrator core; only the output mix
and (for the gain types) the `g`/`k` coefficients change. `A` is
10^(gain_db / 40).
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    #[default]
    Lowpass,
    Highpass,
    Bandpass,
    Lowshelf,
    Highshelf,
    Peaking,
    Notch,
    Allpass,
}

impl FilterType {
    pub const ALL: [FilterType; 8] = [
        FilterType::Lowpass,
        FilterType::Highpass,
        FilterType::Bandpass,
        FilterType::Lowshelf,
        FilterType::Highshelf,
        FilterType::Peaking,
        FilterType::Notch,
        FilterType::Allpass,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterType::Lowpass => "lowpass",
            FilterType::Highpass => "highpass",
            FilterType::Bandpass => "bandpass",
            FilterType::Lowshelf => "lowshelf",
            FilterType::Highshelf => "highshelf",
            FilterType::Peaking => "peaking",
            FilterType::Notch => "notch",
            FilterType::Allpass => "allpass",
        }
    }
}

pub struct FilterOutputs {
    pub input: f32,
    pub lowpass: f32,
    pub bandpass: f32,
}

#[derive(Clone, Copy)]
struct Coefficients {
    g: f32,
    k: f32,
    // 10^(gain/40)
    a: f32,
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub q: f32,
    pub gain_db: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz: 350.0,
            q: 1.0,
            gain_db: 0.0,
            filter_type,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::Lowpass).with_cutoff(cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::Highpass).with_cutoff(cutoff_hz)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::Bandpass).with_cutoff(cutoff_hz)
    }

    pub fn notch(cutoff_hz: f32) -> Self {
        Self::new(FilterType::Notch).with_cutoff(cutoff_hz)
    }

    /// Narrow bell boost, as used by the resonator bank.
    pub fn peaking(cutoff_hz: f32, q: f32, gain_db: f32) -> Self {
        Self::new(FilterType::Peaking)
            .with_cutoff(cutoff_hz)
            .with_q(q)
            .with_gain_db(gain_db)
    }

    pub fn with_cutoff(mut self, cutoff_hz: f32) -> Self {
        self.cutoff_hz = cutoff_hz;
        self
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.q = q;
        self
    }

    pub fn with_gain_db(mut self, gain_db: f32) -> Self {
        self.gain_db = gain_db;
        self
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    #[inline]
    fn coefficients(&self, cutoff_hz: f32, sample_rate: f32) -> Coefficients {
        // Keep the prewarp away from DC and Nyquist, where tan() blows up
        let nyquist = 0.5 * sample_rate;
        let cutoff = cutoff_hz.clamp(1.0, nyquist * 0.999);
        let q = self.q.max(1e-4);
        let a = 10.0f32.powf(self.gain_db / 40.0);
        let g = (PI * cutoff / sample_rate).tan();

        match self.filter_type {
            FilterType::Peaking => Coefficients { g, k: 1.0 / (q * a), a },
            // Shelves ignore Q and use a Butterworth slope
            FilterType::Lowshelf => Coefficients {
                g: g / a.sqrt(),
                k: 2.0 * FRAC_1_SQRT_2,
                a,
            },
            FilterType::Highshelf => Coefficients {
                g: g * a.sqrt(),
                k: 2.0 * FRAC_1_SQRT_2,
                a,
            },
            _ => Coefficients { g, k: 1.0 / q, a },
        }
    }

    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            input: sample,
            lowpass: v2,
            bandpass: v1,
        }
    }

    #[inline]
    fn mix(&self, out: &FilterOutputs, c: Coefficients) -> f32 {
        let (v0, v1, v2) = (out.input, out.bandpass, out.lowpass);
        let Coefficients { k, a, .. } = c;

        match self.filter_type {
            FilterType::Lowpass => v2,
            FilterType::Highpass => v0 - k * v1 - v2,
            FilterType::Bandpass => k * v1,
            FilterType::Notch => v0 - k * v1,
            FilterType::Allpass => v0 - 2.0 * k * v1,
            FilterType::Peaking => v0 + k * (a * a - 1.0) * v1,
            FilterType::Lowshelf => v0 + k * (a - 1.0) * v1 + (a * a - 1.0) * v2,
            FilterType::Highshelf => a * a * v0 + k * a * (1.0 - a) * v1 + (1.0 - a * a) * v2,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        self.render_at(buffer, self.cutoff_hz, sample_rate);
    }

    /// Render with a temporary cutoff (used for modulated frequency).
    pub fn render_at(&mut self, buffer: &mut [f32], cutoff_hz: f32, sample_rate: f32) {
        let c = self.coefficients(cutoff_hz, sample_rate);

        for sample in buffer.iter_mut() {
            let outputs = self.next_sample(*sample, c.k, c.g);
            *sample = self.mix(&outputs, c);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q;
    }

    pub fn set_filter_type(&mut self, filter_type: FilterType) {
        self.filter_type = filter_type;
    }
}
