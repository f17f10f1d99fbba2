use crate::{
    patch::ParameterSet,
    pipeline::{self, Artifacts},
};

/// Everything about what is (or would be) playing.
///
/// Replaced wholesale when the graph's shape changes; scalar changes only
/// touch `params` and, for new distortion amounts, the curve.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    params: ParameterSet,
    artifacts: Artifacts,
    playing: bool,
}

impl PlaybackSession {
    pub fn new(params: ParameterSet, sample_rate: f32, loop_len: usize) -> Self {
        let artifacts = pipeline::derive_with_len(&params, sample_rate, loop_len);
        Self {
            params,
            artifacts,
            playing: false,
        }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub(crate) fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub(crate) fn artifacts_mut(&mut self) -> &mut Artifacts {
        &mut self.artifacts
    }

    pub(crate) fn set_params(&mut self, params: ParameterSet) {
        self.params = params;
    }
}
