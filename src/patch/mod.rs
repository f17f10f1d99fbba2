//! Parameter snapshots and presets.
//!
//! A [`ParameterSet`] is the single value the front end hands to the core.
//! It splits into two kinds of fields:
//!
//! - **shape** fields (`noise_kind`, `mod_type`) decide which stages exist
//!   and how they are wired, so changing them means re-planning the graph;
//! - **scalar** fields ([`ScalarParams`]) only adjust settings of stages that
//!   already exist and can be applied to a running graph in place.

pub mod presets;
pub mod store;

use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use crate::dsp::{distortion::DEFAULT_AMOUNT, FilterType, NoiseKind, Oversample};

pub use presets::BuiltinPreset;
pub use store::{FileStore, KeyValueStore, MemoryStore, PresetStore};

/// Which parameters the shared modulator drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModType {
    #[default]
    None,
    /// Amplitude modulation through a dedicated gain stage.
    Tremolo,
    /// Filter-frequency modulation.
    Filter,
    Both,
}

impl ModType {
    pub const ALL: [ModType; 4] = [ModType::None, ModType::Tremolo, ModType::Filter, ModType::Both];

    pub fn has_tremolo(self) -> bool {
        matches!(self, ModType::Tremolo | ModType::Both)
    }

    pub fn has_filter_mod(self) -> bool {
        matches!(self, ModType::Filter | ModType::Both)
    }

    pub fn name(self) -> &'static str {
        match self {
            ModType::None => "none",
            ModType::Tremolo => "tremolo",
            ModType::Filter => "filter",
            ModType::Both => "both",
        }
    }
}

/// Immutable snapshot of every user control.
///
/// Serialises as the flat record the preset store keeps:
///
/// ```json
/// {"volume":0.3,"noiseType":"brown","distortionAmount":800,
///  "distortionOversample":"4x","filterType":"highpass","filterFrequency":1000.0,
///  "filterQ":12.0,"modSpeed":12.0,"modDepth":0.9,"modType":"both"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSet {
    pub volume: f32,
    #[serde(rename = "noiseType")]
    pub noise_kind: NoiseKind,
    /// Missing, negative or non-numeric amounts read as [`DEFAULT_AMOUNT`].
    #[serde(default = "default_amount", deserialize_with = "lenient_amount")]
    pub distortion_amount: u32,
    pub distortion_oversample: Oversample,
    pub filter_type: FilterType,
    pub filter_frequency: f32,
    pub filter_q: f32,
    pub mod_speed: f32,
    pub mod_depth: f32,
    pub mod_type: ModType,
}

fn default_amount() -> u32 {
    DEFAULT_AMOUNT as u32
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAmount {
    Number(f64),
    Other(IgnoredAny),
}

fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(match StoredAmount::deserialize(deserializer)? {
        StoredAmount::Number(n) if n.is_finite() && n >= 0.0 => n.round().min(u32::MAX as f64) as u32,
        StoredAmount::Number(_) | StoredAmount::Other(_) => default_amount(),
    })
}

impl ParameterSet {
    /// True when switching from `self` to `other` changes the graph's shape.
    pub fn requires_rebuild(&self, other: &ParameterSet) -> bool {
        self.noise_kind != other.noise_kind || self.mod_type != other.mod_type
    }

    pub fn scalars(&self) -> ScalarParams {
        ScalarParams {
            volume: self.volume,
            distortion_amount: self.distortion_amount,
            distortion_oversample: self.distortion_oversample,
            filter_type: self.filter_type,
            filter_frequency: self.filter_frequency,
            filter_q: self.filter_q,
            mod_speed: self.mod_speed,
            mod_depth: self.mod_depth,
        }
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        BuiltinPreset::Medium.params()
    }
}

/// The subset of a [`ParameterSet`] that can change without a rebuild.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarParams {
    pub volume: f32,
    pub distortion_amount: u32,
    pub distortion_oversample: Oversample,
    pub filter_type: FilterType,
    pub filter_frequency: f32,
    pub filter_q: f32,
    pub mod_speed: f32,
    pub mod_depth: f32,
}

/// Where a preset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetSource {
    Builtin(BuiltinPreset),
    Custom,
}

/// A named parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: String,
    pub source: PresetSource,
    pub params: ParameterSet,
}

impl Preset {
    pub fn builtin(preset: BuiltinPreset) -> Self {
        Self {
            name: preset.name().to_string(),
            source: PresetSource::Builtin(preset),
            params: preset.params(),
        }
    }

    pub fn custom(name: impl Into<String>, params: ParameterSet) -> Self {
        Self {
            name: name.into(),
            source: PresetSource::Custom,
            params,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.source == PresetSource::Custom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_with_camel_case_field_names() {
        let json = serde_json::to_value(BuiltinPreset::Extreme.params()).unwrap();
        assert_eq!(json["noiseType"], "brown");
        assert_eq!(json["distortionAmount"], 800);
        assert_eq!(json["distortionOversample"], "4x");
        assert_eq!(json["filterType"], "highpass");
        assert_eq!(json["modType"], "both");
    }

    #[test]
    fn parses_integer_literals_for_float_fields() {
        let json = r#"{"volume":0.2,"noiseType":"pink","distortionAmount":400,
            "distortionOversample":"2x","filterType":"notch","filterFrequency":2000,
            "filterQ":5,"modSpeed":5,"modDepth":0.5,"modType":"tremolo"}"#;
        let params: ParameterSet = serde_json::from_str(json).unwrap();
        assert_eq!(params.filter_frequency, 2000.0);
        assert_eq!(params.filter_type, FilterType::Notch);
        assert_eq!(params.mod_type, ModType::Tremolo);
    }

    #[test]
    fn unusable_distortion_amount_reads_as_default() {
        let rest = r#""volume":0.2,"noiseType":"white","distortionOversample":"none",
            "filterType":"lowpass","filterFrequency":2000,"filterQ":5,"modSpeed":5,
            "modDepth":0.5,"modType":"none""#;

        for amount in ["", r#""distortionAmount":"loud","#, r#""distortionAmount":-4,"#, r#""distortionAmount":null,"#] {
            let json = format!("{{{amount}{rest}}}");
            let params: ParameterSet = serde_json::from_str(&json).unwrap();
            assert_eq!(params.distortion_amount, 50, "for {amount:?}");
        }

        let json = format!(r#"{{"distortionAmount":650.4,{rest}}}"#);
        let params: ParameterSet = serde_json::from_str(&json).unwrap();
        assert_eq!(params.distortion_amount, 650);
    }

    #[test]
    fn shape_fields_decide_rebuilds() {
        let base = ParameterSet::default();

        let louder = ParameterSet {
            volume: 0.9,
            filter_frequency: 100.0,
            ..base.clone()
        };
        assert!(!base.requires_rebuild(&louder));

        let metallic = ParameterSet {
            noise_kind: NoiseKind::Metallic,
            ..base.clone()
        };
        assert!(base.requires_rebuild(&metallic));

        let tremolo = ParameterSet {
            mod_type: ModType::Tremolo,
            ..base.clone()
        };
        assert!(base.requires_rebuild(&tremolo));
    }

    #[test]
    fn mod_type_routes() {
        assert!(!ModType::None.has_tremolo() && !ModType::None.has_filter_mod());
        assert!(ModType::Tremolo.has_tremolo() && !ModType::Tremolo.has_filter_mod());
        assert!(!ModType::Filter.has_tremolo() && ModType::Filter.has_filter_mod());
        assert!(ModType::Both.has_tremolo() && ModType::Both.has_filter_mod());
    }
}
