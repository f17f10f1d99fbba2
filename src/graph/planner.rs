use tracing::debug;

use super::topology::{GraphTopology, Param, StageKind};
use crate::{dsp::NoiseKind, patch::ParameterSet};

/*
Signal Graph Planner
====================

Turns a parameter snapshot into the stages and connections the engine
should run. The main chain never changes shape:

  source → distortion → [resonators] → filter → [tremolo] → gain → analyser → out

Two flags decide what goes in the brackets.


Resonator Bank (metallic noise)
-------------------------------

Metallic noise gets five narrow peaking filters in PARALLEL, plus a
bypass, so the partials ring on top of the unfiltered signal:

                    ┌→ peak 1200 Hz ─┐
                    ├→ peak 2400 Hz ─┤
  distortion → in ──┼→ peak 3600 Hz ─┼→ out → filter
                    ├→ peak 4800 Hz ─┤
                    ├→ peak 6000 Hz ─┤
                    └────────────────┘  (bypass)

In series the boosts would stack into one very loud, very thin band.


Modulation
----------

One sine modulator runs at mod_speed and feeds two independent scaled
taps:

  modulator ─→ depth × 1000 ─→ filter.frequency       (filter | both)
            └→ depth × 0.5  ─→ tremolo.gain           (tremolo | both)

The ×1000 tap always exists; with mod_type = none (or tremolo) nothing
consumes it. The tremolo stage itself is only inserted when its route
is active.
*/

/// Centre frequencies of the metallic resonator bank.
pub const RESONATOR_FREQUENCIES: [f32; 5] = [1200.0, 2400.0, 3600.0, 4800.0, 6000.0];
pub const RESONATOR_Q: f32 = 10.0;
pub const RESONATOR_GAIN_DB: f32 = 15.0;

/// Modulation depth → Hz of filter sweep.
pub const FILTER_MOD_SCALE: f32 = 1000.0;
/// Modulation depth → tremolo gain swing.
pub const TREMOLO_MOD_SCALE: f32 = 0.5;

pub const ANALYSER_FFT_SIZE: usize = 2048;

/// Build the topology for `params`. Total: every parameter set plans.
pub fn plan(params: &ParameterSet) -> GraphTopology {
    let mut graph = GraphTopology::new();

    // 1. Source → Distortion
    let source = graph.add(StageKind::Source);
    let distortion = graph.add(StageKind::Distortion {
        amount: params.distortion_amount,
        oversample: params.distortion_oversample,
    });
    graph.connect(source, distortion);

    // 2. Optional parallel resonator bank
    let pre_filter = if params.noise_kind == NoiseKind::Metallic {
        let input = graph.add(StageKind::ResonatorInput);
        let resonators: Vec<_> = RESONATOR_FREQUENCIES
            .iter()
            .map(|&frequency| {
                graph.add(StageKind::Resonator {
                    frequency,
                    q: RESONATOR_Q,
                    gain_db: RESONATOR_GAIN_DB,
                })
            })
            .collect();
        let output = graph.add(StageKind::ResonatorOutput);

        graph.connect(distortion, input);
        for resonator in resonators {
            graph.connect(input, resonator);
            graph.connect(resonator, output);
        }
        graph.connect(input, output);
        output
    } else {
        distortion
    };

    let filter = graph.add(StageKind::Filter {
        filter_type: params.filter_type,
        frequency: params.filter_frequency,
        q: params.filter_q,
    });
    graph.connect(pre_filter, filter);

    // 6. Shared modulator, always present
    let modulator = graph.add(StageKind::Modulator {
        frequency: params.mod_speed,
    });
    let depth = graph.add(StageKind::ModulationDepth {
        gain: params.mod_depth * FILTER_MOD_SCALE,
    });
    graph.connect(modulator, depth);

    let gain = graph.add(StageKind::Gain {
        gain: params.volume,
    });

    // 3. Optional tremolo between filter and gain
    if params.mod_type.has_tremolo() {
        let tremolo = graph.add(StageKind::TremoloGain);
        let tremolo_depth = graph.add(StageKind::TremoloDepth {
            gain: params.mod_depth * TREMOLO_MOD_SCALE,
        });
        graph.connect(modulator, tremolo_depth);
        graph.connect_param(tremolo_depth, tremolo, Param::Gain);
        graph.connect(filter, tremolo);
        graph.connect(tremolo, gain);
    } else {
        graph.connect(filter, gain);
    }

    // 4. Optional filter sweep, independent of the tremolo
    if params.mod_type.has_filter_mod() {
        graph.connect_param(depth, filter, Param::Frequency);
    }

    // 5. Gain → Analyser → Destination
    let analyser = graph.add(StageKind::Analyser {
        fft_size: ANALYSER_FFT_SIZE,
    });
    let destination = graph.add(StageKind::Destination);
    graph.connect(gain, analyser);
    graph.connect(analyser, destination);

    debug!(
        noise = params.noise_kind.name(),
        mod_type = params.mod_type.name(),
        stages = graph.stages().len(),
        connections = graph.connections().len(),
        "planned signal graph"
    );

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::topology::{StageId, Target},
        patch::{BuiltinPreset, ModType},
    };

    fn params(noise_kind: NoiseKind, mod_type: ModType) -> ParameterSet {
        ParameterSet {
            noise_kind,
            mod_type,
            ..ParameterSet::default()
        }
    }

    fn id(graph: &GraphTopology, pred: impl Fn(&StageKind) -> bool) -> StageId {
        graph.find(pred).expect("stage missing")
    }

    #[test]
    fn metallic_gets_parallel_resonators() {
        let graph = plan(&params(NoiseKind::Metallic, ModType::None));
        let resonators = graph.find_all(StageKind::is_resonator);
        assert_eq!(resonators.len(), 5);

        let input = id(&graph, |k| matches!(k, StageKind::ResonatorInput));
        let output = id(&graph, |k| matches!(k, StageKind::ResonatorOutput));

        for &r in &resonators {
            assert_eq!(graph.inputs_of(r), vec![input], "resonator fed by bank input only");
            assert_eq!(graph.outputs_of(r), vec![output], "resonator feeds bank output only");
        }
        assert!(graph.is_connected(input, output, Target::Input), "bypass path");
        assert_eq!(graph.inputs_of(output).len(), 6);
    }

    #[test]
    fn resonator_settings_are_fixed() {
        let graph = plan(&params(NoiseKind::Metallic, ModType::Both));
        let freqs: Vec<f32> = graph
            .stages()
            .iter()
            .filter_map(|s| match s.kind {
                StageKind::Resonator { frequency, q, gain_db } => {
                    assert_eq!(q, 10.0);
                    assert_eq!(gain_db, 15.0);
                    Some(frequency)
                }
                _ => None,
            })
            .collect();
        assert_eq!(freqs, RESONATOR_FREQUENCIES.to_vec());
    }

    #[test]
    fn other_kinds_skip_the_bank() {
        for kind in [NoiseKind::White, NoiseKind::Pink, NoiseKind::Brown] {
            let graph = plan(&params(kind, ModType::Both));
            assert_eq!(graph.count(StageKind::is_resonator), 0);
            assert_eq!(graph.count(|k| matches!(k, StageKind::ResonatorInput)), 0);

            let distortion = id(&graph, |k| matches!(k, StageKind::Distortion { .. }));
            let filter = id(&graph, |k| matches!(k, StageKind::Filter { .. }));
            assert!(graph.is_connected(distortion, filter, Target::Input));
        }
    }

    #[test]
    fn both_adds_tremolo_and_filter_sweep() {
        let graph = plan(&params(NoiseKind::White, ModType::Both));

        let filter = id(&graph, |k| matches!(k, StageKind::Filter { .. }));
        let tremolo = id(&graph, |k| matches!(k, StageKind::TremoloGain));
        let gain = id(&graph, |k| matches!(k, StageKind::Gain { .. }));
        let depth = id(&graph, |k| matches!(k, StageKind::ModulationDepth { .. }));
        let tremolo_depth = id(&graph, |k| matches!(k, StageKind::TremoloDepth { .. }));

        assert!(graph.is_connected(filter, tremolo, Target::Input));
        assert!(graph.is_connected(tremolo, gain, Target::Input));
        assert!(!graph.is_connected(filter, gain, Target::Input));
        assert!(graph.is_connected(depth, filter, Target::Param(Param::Frequency)));
        assert!(graph.is_connected(tremolo_depth, tremolo, Target::Param(Param::Gain)));
    }

    #[test]
    fn none_leaves_modulator_unconsumed() {
        let graph = plan(&params(NoiseKind::White, ModType::None));

        let filter = id(&graph, |k| matches!(k, StageKind::Filter { .. }));
        let gain = id(&graph, |k| matches!(k, StageKind::Gain { .. }));
        let depth = id(&graph, |k| matches!(k, StageKind::ModulationDepth { .. }));

        assert!(graph.is_connected(filter, gain, Target::Input));
        assert_eq!(graph.count(|k| matches!(k, StageKind::TremoloGain)), 0);
        assert!(graph.outputs_of(depth).is_empty());
        assert!(graph
            .connections()
            .iter()
            .all(|c| !matches!(c.target, Target::Param(_))));
    }

    #[test]
    fn routes_are_independent() {
        let tremolo = plan(&params(NoiseKind::Pink, ModType::Tremolo));
        let filter = id(&tremolo, |k| matches!(k, StageKind::Filter { .. }));
        assert!(tremolo.param_inputs_of(filter, Param::Frequency).is_empty());
        assert_eq!(tremolo.count(|k| matches!(k, StageKind::TremoloGain)), 1);

        let sweep = plan(&params(NoiseKind::Pink, ModType::Filter));
        let filter = id(&sweep, |k| matches!(k, StageKind::Filter { .. }));
        assert_eq!(sweep.param_inputs_of(filter, Param::Frequency).len(), 1);
        assert_eq!(sweep.count(|k| matches!(k, StageKind::TremoloGain)), 0);
    }

    #[test]
    fn single_source_and_destination_for_every_shape() {
        for kind in NoiseKind::ALL {
            for mod_type in ModType::ALL {
                let graph = plan(&params(kind, mod_type));
                assert_eq!(graph.count(|k| matches!(k, StageKind::Source)), 1);
                assert_eq!(graph.count(|k| matches!(k, StageKind::Destination)), 1);
                assert!(graph.topological_order().is_ok());

                let source = id(&graph, |k| matches!(k, StageKind::Source));
                let dest = id(&graph, |k| matches!(k, StageKind::Destination));
                let paths = graph.audio_paths(source, dest);
                let expected = if kind == NoiseKind::Metallic { 6 } else { 1 };
                assert_eq!(paths.len(), expected, "{:?}/{:?}", kind, mod_type);
            }
        }
    }

    #[test]
    fn stage_settings_come_from_params() {
        let p = BuiltinPreset::Extreme.params();
        let graph = plan(&p);

        let filter = id(&graph, |k| matches!(k, StageKind::Filter { .. }));
        assert_eq!(
            graph.stage(filter).unwrap().kind,
            StageKind::Filter {
                filter_type: p.filter_type,
                frequency: 1000.0,
                q: 12.0
            }
        );

        let depth = id(&graph, |k| matches!(k, StageKind::ModulationDepth { .. }));
        match graph.stage(depth).unwrap().kind {
            StageKind::ModulationDepth { gain } => assert!((gain - 900.0).abs() < 1e-3),
            _ => unreachable!(),
        }
        let tremolo_depth = id(&graph, |k| matches!(k, StageKind::TremoloDepth { .. }));
        match graph.stage(tremolo_depth).unwrap().kind {
            StageKind::TremoloDepth { gain } => assert!((gain - 0.45).abs() < 1e-6),
            _ => unreachable!(),
        }
    }
}
