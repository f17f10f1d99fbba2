use tracing::{debug, info};

use super::{
    host::{AudioHost, OfflineHost},
    session::PlaybackSession,
};
use crate::{
    config::EngineConfig,
    dsp::{noise, DistortionCurve},
    error::Result,
    graph::planner,
    patch::{ParameterSet, Preset},
};

/// Owns the playback session and drives an [`AudioHost`].
///
/// Shape changes (`noise_kind`, `mod_type`) rebuild the session; everything
/// else is pushed to the running graph in place.
pub struct Controller<H: AudioHost> {
    host: H,
    session: PlaybackSession,
    sample_rate: f32,
    loop_len: usize,
}

impl<H: AudioHost> Controller<H> {
    pub fn new(host: H, params: ParameterSet, sample_rate: f32) -> Self {
        Self::with_loop_len(host, params, sample_rate, noise::loop_len(sample_rate))
    }

    /// Loop length taken from `config.loop_seconds`.
    pub fn from_config(host: H, params: ParameterSet, sample_rate: f32, config: &EngineConfig) -> Self {
        Self::with_loop_len(host, params, sample_rate, config.loop_len(sample_rate))
    }

    pub fn with_loop_len(host: H, params: ParameterSet, sample_rate: f32, loop_len: usize) -> Self {
        Self {
            host,
            session: PlaybackSession::new(params, sample_rate, loop_len),
            sample_rate,
            loop_len,
        }
    }

    pub fn params(&self) -> &ParameterSet {
        self.session.params()
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_playing()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Start playback. No-op while already playing.
    pub fn start(&mut self) -> Result<()> {
        if self.session.is_playing() {
            return Ok(());
        }

        let renderer = self.session.artifacts().renderer(self.sample_rate)?;
        self.host.start(Box::new(renderer))?;
        self.session.set_playing(true);

        let params = self.session.params();
        info!(
            noise = params.noise_kind.name(),
            mod_type = params.mod_type.name(),
            "playback started"
        );
        Ok(())
    }

    /// Stop playback. No-op while stopped.
    pub fn stop(&mut self) -> Result<()> {
        if !self.session.is_playing() {
            return Ok(());
        }

        self.host.stop()?;
        self.session.set_playing(false);
        info!("playback stopped");
        Ok(())
    }

    /// Apply `params` to the existing graph without rebuilding it.
    ///
    /// Shape fields in `params` are ignored; use [`Controller::set_params`]
    /// when they may have changed.
    pub fn update(&mut self, mut params: ParameterSet) -> Result<()> {
        params.noise_kind = self.session.params().noise_kind;
        params.mod_type = self.session.params().mod_type;

        let curve = if params.distortion_amount != self.session.params().distortion_amount {
            Some(DistortionCurve::build(params.distortion_amount as f32))
        } else {
            None
        };

        if self.session.is_playing() {
            self.host.update(params.scalars(), curve.clone())?;
        }

        let artifacts = self.session.artifacts_mut();
        if let Some(curve) = curve {
            artifacts.curve = curve;
        }
        artifacts.topology = planner::plan(&params);
        self.session.set_params(params);
        Ok(())
    }

    /// Tear down and re-derive everything for `params`, resuming playback
    /// if it was running.
    pub fn rebuild(&mut self, params: ParameterSet) -> Result<()> {
        let was_playing = self.session.is_playing();
        self.stop()?;

        debug!(
            noise = params.noise_kind.name(),
            mod_type = params.mod_type.name(),
            was_playing,
            "rebuilding session"
        );
        self.session = PlaybackSession::new(params, self.sample_rate, self.loop_len);

        if was_playing {
            self.start()?;
        }
        Ok(())
    }

    /// Update in place or rebuild, whichever `params` requires.
    pub fn set_params(&mut self, params: ParameterSet) -> Result<()> {
        if self.session.params().requires_rebuild(&params) {
            self.rebuild(params)
        } else {
            self.update(params)
        }
    }

    pub fn apply_preset(&mut self, preset: &Preset) -> Result<()> {
        info!(preset = %preset.name, custom = preset.is_custom(), "applying preset");
        self.set_params(preset.params.clone())
    }
}

impl Controller<OfflineHost> {
    /// Controller over an [`OfflineHost`] running at `config.sample_rate`.
    pub fn offline(params: ParameterSet, config: &EngineConfig) -> Self {
        Self::from_config(OfflineHost::new(), params, config.sample_rate, config)
    }

    /// Pull the next block from the offline host.
    pub fn render(&mut self, out: &mut [f32]) {
        self.host.render(out);
    }
}
