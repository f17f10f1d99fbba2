pub mod config;
pub mod dsp;
pub mod engine; // Block renderer and audio-thread player
pub mod error;
pub mod graph; // Stage topology and planning
pub mod patch; // Parameter sets, presets and storage
pub mod pipeline;
pub mod runtime; // Playback control

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use patch::{ParameterSet, Preset};

pub const MAX_BLOCK_SIZE: usize = 2048;
