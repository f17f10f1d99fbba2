//! Audio device setup and the cpal-backed host.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ratatui::DefaultTerminal;
use tracing::{error, info};

use shatter_dsp::{
    dsp::DistortionCurve,
    engine::GraphRenderer,
    patch::{BuiltinPreset, FileStore, PresetStore, ScalarParams},
    runtime::{ring_host, scope_ring, AudioHost, Controller, RingHost},
    EngineConfig, Error, ParameterSet, MAX_BLOCK_SIZE,
};

use super::ui::UiApp;

/// Capacity of the control → audio message ring
const MESSAGE_RING_LEN: usize = 64;

/// Output stream plus the control end of its message ring.
///
/// The stream runs for the whole session; a stopped player renders silence.
pub struct CpalHost {
    ring: RingHost,
    _stream: cpal::Stream,
}

impl AudioHost for CpalHost {
    fn start(&mut self, renderer: Box<GraphRenderer>) -> shatter_dsp::Result<()> {
        self.ring.start(renderer)
    }

    fn stop(&mut self) -> shatter_dsp::Result<()> {
        self.ring.stop()
    }

    fn update(&mut self, scalars: ScalarParams, curve: Option<DistortionCurve>) -> shatter_dsp::Result<()> {
        self.ring.update(scalars, curve)
    }
}

pub struct Shatter {
    config: EngineConfig,
    store: PresetStore<FileStore>,
}

impl Shatter {
    pub fn new(config: EngineConfig, store: FileStore) -> EyreResult<Self> {
        Ok(Self {
            config,
            store: PresetStore::new(store),
        })
    }

    /// Open the default device, start the stream and hand over to the UI.
    pub fn run(self, terminal: DefaultTerminal) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let stream_config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = stream_config.sample_rate().0 as f32;
        let channels = stream_config.channels() as usize;
        info!(sample_rate, channels, "opened output device");

        let (ring, player) = ring_host(MESSAGE_RING_LEN);
        let (scope_tx, scope) = scope_ring(
            self.config.scope_ring_len(),
            self.config.analyser_fft_size,
            sample_rate,
        );

        let stream = device
            .build_output_stream(
                &stream_config.into(),
                {
                    let mut player = player.with_scope_tap(Box::new(scope_tx));
                    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
                    move |data: &mut [f32], _| {
                        let total_frames = data.len() / channels;
                        let mut frames_written = 0;
                        while frames_written < total_frames {
                            let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                            let block = &mut render_buf[..frames_to_render];
                            player.render_block(block);

                            // Duplicate mono to all channels
                            let out_off = frames_written * channels;
                            for (i, &s) in block.iter().enumerate() {
                                for ch in 0..channels {
                                    data[out_off + i * channels + ch] = s;
                                }
                            }

                            frames_written += frames_to_render;
                        }
                    }
                },
                |err| error!(error = %err, "output stream error"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;

        let params = self.initial_params()?;
        let cpal_host = CpalHost {
            ring,
            _stream: stream,
        };
        let controller = Controller::from_config(cpal_host, params, sample_rate, &self.config);

        UiApp::new(controller, self.store, scope).run(terminal)
    }

    /// Parameters of the configured start-up preset, built-in or saved.
    fn initial_params(&self) -> EyreResult<ParameterSet> {
        let name = self.config.default_preset.as_str();
        if let Some(preset) = BuiltinPreset::from_name(name) {
            return Ok(preset.params());
        }
        self.store
            .get(name)
            .ok_or_else(|| Error::UnknownPreset(name.to_string()))
            .wrap_err("cannot start with the requested preset")
    }
}
