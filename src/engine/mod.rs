//! Block renderer for a planned [`GraphTopology`].
//!
//! [`GraphRenderer`] turns a topology into one [`Processor`] per stage and
//! renders mono blocks by visiting the stages in topological order. Audio
//! inputs are summed into a stage's buffer before it runs; parameter inputs
//! are summed separately and added to the stage's own value (see
//! [`crate::dsp::gain`]).
//!
//! All buffers are allocated up front for blocks of up to
//! [`MAX_BLOCK_SIZE`] samples, so `render_block` never allocates.

pub mod message;
pub mod player;
mod stage;

use std::sync::Arc;

use tracing::debug;

use crate::{
    dsp::{gain::sum_in_place, DistortionCurve, NoiseBuffer},
    error::Result,
    graph::{
        planner::{FILTER_MOD_SCALE, TREMOLO_MOD_SCALE},
        GraphTopology, StageKind, Target,
    },
    patch::ScalarParams,
    MAX_BLOCK_SIZE,
};

pub use message::{EngineMessage, MessageReceiver};
pub use player::Player;
pub use stage::SampleSink;

use stage::Processor;

pub struct GraphRenderer {
    sample_rate: f32,
    kinds: Vec<StageKind>,
    processors: Vec<Processor>,
    /// Stage indices, producers before consumers
    order: Vec<usize>,
    audio_inputs: Vec<Vec<usize>>,
    param_inputs: Vec<Vec<usize>>,
    buffers: Vec<Vec<f32>>,
    modulation: Vec<f32>,
    output: Option<usize>,
}

impl GraphRenderer {
    pub fn new(
        buffer: Arc<NoiseBuffer>,
        curve: &DistortionCurve,
        topology: &GraphTopology,
        sample_rate: f32,
    ) -> Result<Self> {
        let order: Vec<usize> = topology.topological_order()?.into_iter().map(|id| id.0).collect();
        let stages = topology.stages();

        let kinds: Vec<StageKind> = stages.iter().map(|s| s.kind.clone()).collect();
        let processors: Vec<Processor> = kinds
            .iter()
            .map(|kind| Processor::from_kind(kind, &buffer, curve))
            .collect();

        let mut audio_inputs = vec![Vec::new(); stages.len()];
        let mut param_inputs = vec![Vec::new(); stages.len()];
        for c in topology.connections() {
            match c.target {
                Target::Input => audio_inputs[c.to.0].push(c.from.0),
                Target::Param(param) => {
                    if processors[c.to.0].modulated_param() == Some(param) {
                        param_inputs[c.to.0].push(c.from.0);
                    }
                }
            }
        }

        let output = kinds.iter().position(|k| matches!(k, StageKind::Destination));

        debug!(
            stages = stages.len(),
            sample_rate,
            loop_len = buffer.len(),
            "built graph renderer"
        );

        Ok(Self {
            sample_rate,
            kinds,
            processors,
            order,
            audio_inputs,
            param_inputs,
            buffers: vec![vec![0.0; MAX_BLOCK_SIZE]; stages.len()],
            modulation: vec![0.0; MAX_BLOCK_SIZE],
            output,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn stage_count(&self) -> usize {
        self.kinds.len()
    }

    /// Render the next `out.len()` samples of the graph output.
    pub fn render_block(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk);
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        let len = out.len();

        for &i in &self.order {
            // Take the stage's buffer so its inputs can be read alongside
            let mut buffer = std::mem::take(&mut self.buffers[i]);
            let block = &mut buffer[..len];

            block.fill(0.0);
            for &src in &self.audio_inputs[i] {
                sum_in_place(block, &self.buffers[src][..len]);
            }

            let modulation = if self.param_inputs[i].is_empty() {
                None
            } else {
                let modulation = &mut self.modulation[..len];
                modulation.fill(0.0);
                for &src in &self.param_inputs[i] {
                    sum_in_place(modulation, &self.buffers[src][..len]);
                }
                Some(&*modulation)
            };

            self.processors[i].process(block, modulation, self.sample_rate);
            self.buffers[i] = buffer;
        }

        match self.output {
            Some(i) => out.copy_from_slice(&self.buffers[i][..len]),
            None => out.fill(0.0),
        }
    }

    /// Apply every field that does not change the graph's shape.
    ///
    /// Rebuilds the distortion curve when the amount changed and no
    /// matching curve was installed with [`GraphRenderer::set_curve`].
    pub fn apply_scalars(&mut self, scalars: &ScalarParams) {
        for (kind, processor) in self.kinds.iter_mut().zip(self.processors.iter_mut()) {
            match (kind, processor) {
                (StageKind::Gain { gain }, Processor::Gain { gain: g }) => {
                    *gain = scalars.volume;
                    *g = scalars.volume;
                }
                (StageKind::Distortion { amount, oversample }, Processor::Shaper(shaper)) => {
                    *amount = scalars.distortion_amount;
                    *oversample = scalars.distortion_oversample;
                    if shaper.curve().amount() != scalars.distortion_amount as f32 {
                        shaper.set_curve(DistortionCurve::build(scalars.distortion_amount as f32));
                    }
                    shaper.set_oversample(scalars.distortion_oversample);
                }
                (
                    StageKind::Filter {
                        filter_type,
                        frequency,
                        q,
                    },
                    Processor::Filter(filter),
                ) => {
                    *filter_type = scalars.filter_type;
                    *frequency = scalars.filter_frequency;
                    *q = scalars.filter_q;
                    filter.set_filter_type(scalars.filter_type);
                    filter.set_cutoff(scalars.filter_frequency);
                    filter.set_q(scalars.filter_q);
                }
                (StageKind::Modulator { frequency }, Processor::Modulator(osc)) => {
                    *frequency = scalars.mod_speed;
                    osc.set_frequency(scalars.mod_speed);
                }
                (StageKind::ModulationDepth { gain }, Processor::Gain { gain: g }) => {
                    *gain = scalars.mod_depth * FILTER_MOD_SCALE;
                    *g = *gain;
                }
                (StageKind::TremoloDepth { gain }, Processor::Gain { gain: g }) => {
                    *gain = scalars.mod_depth * TREMOLO_MOD_SCALE;
                    *g = *gain;
                }
                _ => {}
            }
        }
    }

    /// Swap in a pre-built distortion curve.
    pub fn set_curve(&mut self, curve: DistortionCurve) {
        if let Some(Processor::Shaper(shaper)) = self
            .processors
            .iter_mut()
            .find(|p| matches!(p, Processor::Shaper(_)))
        {
            shaper.set_curve(curve);
        }
    }

    /// Settings of every stage as currently applied.
    pub fn stage_kinds(&self) -> &[StageKind] {
        &self.kinds
    }

    /// Attach the scope tap to the analyser stage.
    pub fn set_scope_tap(&mut self, sink: Box<dyn SampleSink>) {
        if let Some(tap) = self.analyser_tap() {
            *tap = Some(sink);
        }
    }

    /// Detach the scope tap so it can move to a replacement renderer.
    pub fn take_scope_tap(&mut self) -> Option<Box<dyn SampleSink>> {
        self.analyser_tap().and_then(Option::take)
    }

    fn analyser_tap(&mut self) -> Option<&mut Option<Box<dyn SampleSink>>> {
        self.processors.iter_mut().find_map(|p| match p {
            Processor::Analyser { tap } => Some(tap),
            _ => None,
        })
    }
}
