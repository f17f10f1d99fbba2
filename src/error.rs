//! Error type shared by the preset store, configuration loading and the
//! playback controller.
//!
//! Synthesis, curve building and planning never fail, so nothing in `dsp`
//! or `graph::planner` returns this type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("preset name must not be empty")]
    EmptyPresetName,

    #[error("no preset named {0:?}")]
    UnknownPreset(String),

    #[error("topology contains a cycle")]
    CyclicTopology,

    /// The audio host refused a command (device gone, ring full, ...).
    #[error("audio host: {0}")]
    Host(String),
}

pub type Result<T> = std::result::Result<T, Error>;
