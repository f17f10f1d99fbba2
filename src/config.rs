//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! sample_rate = 44100.0
//! loop_seconds = 2.0
//! analyser_fft_size = 2048
//! scope_ring_blocks = 16
//! store_dir = "/home/me/.local/share/shatter"
//! default_preset = "medium"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sample rate for offline rendering (`runtime::Controller::offline`).
    pub sample_rate: f32,
    /// Length of the pre-rendered noise loop in seconds.
    pub loop_seconds: f32,
    /// Window size of the analyser stage.
    pub analyser_fft_size: usize,
    /// Capacity of the audio → UI scope ring, in analyser windows.
    pub scope_ring_blocks: usize,
    /// Directory for persisted custom presets. `None` uses the platform data dir.
    pub store_dir: Option<PathBuf>,
    /// Built-in preset applied at start-up.
    pub default_preset: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            loop_seconds: 2.0,
            analyser_fft_size: crate::graph::planner::ANALYSER_FFT_SIZE,
            scope_ring_blocks: 16,
            store_dir: None,
            default_preset: "medium".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Number of samples in the noise loop at `sample_rate`.
    pub fn loop_len(&self, sample_rate: f32) -> usize {
        (self.loop_seconds.max(0.0) * sample_rate) as usize
    }

    /// Capacity of the scope ring in samples.
    pub fn scope_ring_len(&self) -> usize {
        self.analyser_fft_size * self.scope_ring_blocks.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config = EngineConfig::from_toml_str(
            "sample_rate = 44100.0\ndefault_preset = \"extreme\"\n",
        )
        .unwrap();
        assert_eq!(config.sample_rate, 44_100.0);
        assert_eq!(config.default_preset, "extreme");
        assert_eq!(config.loop_seconds, 2.0);
    }

    #[test]
    fn loop_len_is_two_seconds_by_default() {
        let config = EngineConfig::default();
        assert_eq!(config.loop_len(44_100.0), 88_200);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(EngineConfig::from_toml_str("sample_rate = \"fast\"").is_err());
    }
}
