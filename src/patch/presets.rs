//! The five built-in presets.

use super::{ModType, ParameterSet};
use crate::dsp::{FilterType, NoiseKind, Oversample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinPreset {
    Mild,
    Medium,
    Intense,
    Extreme,
    Metallic,
}

impl BuiltinPreset {
    pub const ALL: [BuiltinPreset; 5] = [
        BuiltinPreset::Mild,
        BuiltinPreset::Medium,
        BuiltinPreset::Intense,
        BuiltinPreset::Extreme,
        BuiltinPreset::Metallic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinPreset::Mild => "mild",
            BuiltinPreset::Medium => "medium",
            BuiltinPreset::Intense => "intense",
            BuiltinPreset::Extreme => "extreme",
            BuiltinPreset::Metallic => "metallic",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn params(self) -> ParameterSet {
        match self {
            BuiltinPreset::Mild => ParameterSet {
                volume: 0.15,
                noise_kind: NoiseKind::White,
                distortion_amount: 200,
                distortion_oversample: Oversample::X2,
                filter_type: FilterType::Lowpass,
                filter_frequency: 3000.0,
                filter_q: 2.0,
                mod_speed: 2.0,
                mod_depth: 0.3,
                mod_type: ModType::Filter,
            },
            BuiltinPreset::Medium => ParameterSet {
                volume: 0.2,
                noise_kind: NoiseKind::White,
                distortion_amount: 400,
                distortion_oversample: Oversample::X4,
                filter_type: FilterType::Bandpass,
                filter_frequency: 2000.0,
                filter_q: 5.0,
                mod_speed: 5.0,
                mod_depth: 0.5,
                mod_type: ModType::Filter,
            },
            BuiltinPreset::Intense => ParameterSet {
                volume: 0.25,
                noise_kind: NoiseKind::Pink,
                distortion_amount: 600,
                distortion_oversample: Oversample::X4,
                filter_type: FilterType::Bandpass,
                filter_frequency: 1500.0,
                filter_q: 8.0,
                mod_speed: 8.0,
                mod_depth: 0.7,
                mod_type: ModType::Both,
            },
            BuiltinPreset::Extreme => ParameterSet {
                volume: 0.3,
                noise_kind: NoiseKind::Brown,
                distortion_amount: 800,
                distortion_oversample: Oversample::X4,
                filter_type: FilterType::Highpass,
                filter_frequency: 1000.0,
                filter_q: 12.0,
                mod_speed: 12.0,
                mod_depth: 0.9,
                mod_type: ModType::Both,
            },
            BuiltinPreset::Metallic => ParameterSet {
                volume: 0.25,
                noise_kind: NoiseKind::Metallic,
                distortion_amount: 500,
                distortion_oversample: Oversample::X4,
                filter_type: FilterType::Bandpass,
                filter_frequency: 3000.0,
                filter_q: 10.0,
                mod_speed: 15.0,
                mod_depth: 0.8,
                mod_type: ModType::Both,
            },
        }
    }
}
