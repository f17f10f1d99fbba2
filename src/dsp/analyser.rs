//! Signal analysis for the output visualisers.
//!
//! Keeps the most recent `fft_size` samples and exposes them as a waveform
//! (float or byte scaled) and as a log-spaced magnitude spectrum.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Default number of log-spaced spectrum bins.
pub const SPECTRUM_BINS: usize = 48;

pub struct Analyser {
    /// Ring of the last `fft_size` samples
    history: Vec<f32>,
    /// Next write position in `history`
    head: usize,
    /// Hann window coefficients
    window: Vec<f32>,
    /// Frequency values for each bin (Hz)
    freq_bins: Vec<f64>,
    /// FFT bin indices corresponding to each frequency
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (frequency_hz, magnitude_db)
    spectrum: Vec<(f64, f64)>,
}

impl Analyser {
    pub fn new(fft_size: usize, sample_rate: f32) -> Self {
        Self::with_bins(fft_size, sample_rate, SPECTRUM_BINS)
    }

    pub fn with_bins(fft_size: usize, sample_rate: f32, num_bins: usize) -> Self {
        let fft_size = fft_size.max(2);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        // Hann window - reduces spectral leakage
        let denom = (fft_size - 1) as f32;
        let window: Vec<f32> = (0..fft_size)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        // Log-spaced frequency bins (20 Hz to Nyquist)
        let mut freq_bins = Vec::with_capacity(num_bins);
        let mut bin_indices = Vec::with_capacity(num_bins);
        let max_freq = (sample_rate / 2.0).min(20_000.0).max(1.0);
        let min_freq = 20.0f32.min(max_freq);
        let ratio = (max_freq / min_freq) as f64;
        let half = fft_size / 2;

        for i in 0..num_bins {
            let t = if num_bins > 1 {
                i as f64 / (num_bins - 1) as f64
            } else {
                0.0
            };
            let freq = min_freq as f64 * ratio.powf(t);
            let index = (freq * fft_size as f64 / sample_rate as f64).round() as usize;
            freq_bins.push(freq);
            bin_indices.push(index.min(half - 1));
        }

        let spectrum = freq_bins.iter().map(|&f| (f, -120.0)).collect();

        Self {
            history: vec![0.0; fft_size],
            head: 0,
            window,
            freq_bins,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            spectrum,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.history.len()
    }

    /// Append samples, discarding the oldest once the window is full.
    pub fn push(&mut self, samples: &[f32]) {
        let n = self.history.len();
        for &s in samples {
            self.history[self.head] = s;
            self.head = (self.head + 1) % n;
        }
    }

    pub fn clear(&mut self) {
        self.history.fill(0.0);
        self.head = 0;
    }

    /// Window contents, oldest first.
    pub fn time_domain(&self, out: &mut Vec<f32>) {
        out.clear();
        out.extend_from_slice(&self.history[self.head..]);
        out.extend_from_slice(&self.history[..self.head]);
    }

    /// Window contents scaled to bytes: 128 is silence, 0 and 255 full scale.
    pub fn byte_time_domain(&self, out: &mut Vec<u8>) {
        out.clear();
        let ordered = self.history[self.head..]
            .iter()
            .chain(self.history[..self.head].iter());
        out.extend(ordered.map(|&s| (128.0 + 128.0 * s).clamp(0.0, 255.0) as u8));
    }

    pub fn peak(&self) -> f32 {
        self.history.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    pub fn rms(&self) -> f32 {
        (self.history.iter().map(|&x| x * x).sum::<f32>() / self.history.len() as f32).sqrt()
    }

    /// Recompute and return the spectrum of the current window.
    pub fn frequency_db(&mut self) -> &[(f64, f64)] {
        let n = self.history.len();
        for i in 0..n {
            let sample = self.history[(self.head + i) % n];
            self.scratch[i].re = sample * self.window[i];
            self.scratch[i].im = 0.0;
        }

        self.fft.process(&mut self.scratch);

        for (i, &idx) in self.bin_indices.iter().enumerate() {
            let bin = self.scratch[idx];
            let power = (bin.re * bin.re + bin.im * bin.im).max(1e-12);
            self.spectrum[i] = (self.freq_bins[i], 10.0 * (power as f64).log10());
        }

        &self.spectrum
    }

    /// Spectrum from the last [`Analyser::frequency_db`] call.
    pub fn spectrum(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}
