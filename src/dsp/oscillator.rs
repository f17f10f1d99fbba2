use std::f32::consts::TAU;

/// Phase-accumulating sine oscillator.
///
/// Used as the shared low-frequency modulator. Output is bipolar in [-1, 1].
pub struct Oscillator {
    frequency: f32,
    // Normalised phase in [0, 1)
    phase: f32,
}

impl Oscillator {
    pub fn sine(frequency: f32) -> Self {
        Self {
            frequency,
            phase: 0.0,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let out = (TAU * self.phase).sin();
        self.phase += self.frequency / sample_rate;
        self.phase -= self.phase.floor();
        out
    }

    pub fn render(&mut self, out: &mut [f32], sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(sample_rate);
        }
    }
}
