#[cfg(feature = "rtrb")]
use rtrb::Producer;

use std::sync::Arc;

use crate::{
    dsp::{
        distortion::Waveshaper,
        filter::SVFilter,
        gain::{apply_gain, apply_modulated_gain, block_average, CONTROL_BLOCK},
        oscillator::Oscillator,
        DistortionCurve, NoiseBuffer,
    },
    graph::{Param, StageKind},
};

/// Where the analyser stage sends the samples it sees.
pub trait SampleSink: Send {
    /// Push one sample. Returns false when the sample was dropped.
    fn push(&mut self, sample: f32) -> bool;
}

#[cfg(feature = "rtrb")]
impl SampleSink for Producer<f32> {
    #[inline]
    fn push(&mut self, sample: f32) -> bool {
        Producer::push(self, sample).is_ok()
    }
}

/// Runtime state of one stage.
pub(crate) enum Processor {
    Source {
        buffer: Arc<NoiseBuffer>,
        position: usize,
    },
    Shaper(Waveshaper),
    Filter(SVFilter),
    /// Every gain-like stage: bank splits and merges, tremolo, master volume,
    /// both depth scalers.
    Gain { gain: f32 },
    Modulator(Oscillator),
    Analyser { tap: Option<Box<dyn SampleSink>> },
    Destination,
}

impl Processor {
    pub(crate) fn from_kind(kind: &StageKind, buffer: &Arc<NoiseBuffer>, curve: &DistortionCurve) -> Self {
        match *kind {
            StageKind::Source => Processor::Source {
                buffer: Arc::clone(buffer),
                position: 0,
            },
            StageKind::Distortion { oversample, .. } => {
                Processor::Shaper(Waveshaper::new(curve.clone(), oversample))
            }
            StageKind::Resonator { frequency, q, gain_db } => {
                Processor::Filter(SVFilter::peaking(frequency, q, gain_db))
            }
            StageKind::Filter {
                filter_type,
                frequency,
                q,
            } => Processor::Filter(SVFilter::new(filter_type).with_cutoff(frequency).with_q(q)),
            StageKind::ResonatorInput | StageKind::ResonatorOutput | StageKind::TremoloGain => {
                Processor::Gain { gain: 1.0 }
            }
            StageKind::Gain { gain }
            | StageKind::ModulationDepth { gain }
            | StageKind::TremoloDepth { gain } => Processor::Gain { gain },
            StageKind::Modulator { frequency } => Processor::Modulator(Oscillator::sine(frequency)),
            StageKind::Analyser { .. } => Processor::Analyser { tap: None },
            StageKind::Destination => Processor::Destination,
        }
    }

    /// The one parameter this stage lets signals modulate, if any.
    pub(crate) fn modulated_param(&self) -> Option<Param> {
        match self {
            Processor::Filter(_) => Some(Param::Frequency),
            Processor::Gain { .. } => Some(Param::Gain),
            _ => None,
        }
    }

    /// Process `block` in place. `block` holds the summed audio inputs on
    /// entry; `modulation` holds the summed parameter inputs when any are
    /// connected.
    pub(crate) fn process(&mut self, block: &mut [f32], modulation: Option<&[f32]>, sample_rate: f32) {
        match self {
            Processor::Source { buffer, position } => {
                let samples = buffer.samples();
                if samples.is_empty() {
                    block.fill(0.0);
                    return;
                }
                for out in block.iter_mut() {
                    *out = samples[*position];
                    *position = (*position + 1) % samples.len();
                }
            }
            Processor::Shaper(shaper) => shaper.process(block),
            Processor::Filter(filter) => match modulation {
                Some(modulation) => {
                    let base = filter.cutoff_hz;
                    for (chunk, mods) in block
                        .chunks_mut(CONTROL_BLOCK)
                        .zip(modulation.chunks(CONTROL_BLOCK))
                    {
                        filter.render_at(chunk, base + block_average(mods), sample_rate);
                    }
                }
                None => filter.render(block, sample_rate),
            },
            Processor::Gain { gain } => match modulation {
                Some(modulation) => apply_modulated_gain(block, *gain, modulation),
                None => apply_gain(block, *gain),
            },
            Processor::Modulator(osc) => osc.render(block, sample_rate),
            Processor::Analyser { tap } => {
                if let Some(tap) = tap {
                    // Drop on overflow; the scope only needs recent samples
                    for &sample in block.iter() {
                        if !tap.push(sample) {
                            break;
                        }
                    }
                }
            }
            Processor::Destination => {}
        }
    }
}
