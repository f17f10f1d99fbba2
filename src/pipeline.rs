//! Parameters → everything a renderer needs.
//!
//! [`derive`] is the whole "what should be playing" computation: synthesise
//! the loop, build the curve, plan the graph. It has no side effects beyond
//! the random draws, so the controller, tests and benches all share it.

use std::sync::Arc;

use crate::{
    dsp::{noise, DistortionCurve, NoiseBuffer},
    error::Result,
    engine::GraphRenderer,
    graph::{planner, GraphTopology},
    patch::ParameterSet,
};

/// Derived, immutable inputs of one graph build.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub buffer: Arc<NoiseBuffer>,
    pub curve: DistortionCurve,
    pub topology: GraphTopology,
}

impl Artifacts {
    pub fn renderer(&self, sample_rate: f32) -> Result<GraphRenderer> {
        GraphRenderer::new(Arc::clone(&self.buffer), &self.curve, &self.topology, sample_rate)
    }
}

/// Derive with the standard two-second loop.
pub fn derive(params: &ParameterSet, sample_rate: f32) -> Artifacts {
    derive_with_len(params, sample_rate, noise::loop_len(sample_rate))
}

pub fn derive_with_len(params: &ParameterSet, sample_rate: f32, loop_len: usize) -> Artifacts {
    Artifacts {
        buffer: Arc::new(noise::synthesize(params.noise_kind, loop_len, sample_rate)),
        curve: DistortionCurve::build(params.distortion_amount as f32),
        topology: planner::plan(params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::StageKind,
        patch::BuiltinPreset,
    };

    #[test]
    fn extreme_preset_artifacts() {
        let artifacts = derive(&BuiltinPreset::Extreme.params(), 8_000.0);

        assert_eq!(artifacts.buffer.len(), 16_000);
        assert_eq!(artifacts.curve, DistortionCurve::build(800.0));
        assert_eq!(artifacts.topology.count(StageKind::is_resonator), 0);
        assert_eq!(artifacts.topology.count(|k| matches!(k, StageKind::TremoloGain)), 1);
    }

    #[test]
    fn custom_loop_length() {
        let artifacts = derive_with_len(&ParameterSet::default(), 48_000.0, 480);
        assert_eq!(artifacts.buffer.len(), 480);
        assert!(artifacts.renderer(48_000.0).is_ok());
    }
}
