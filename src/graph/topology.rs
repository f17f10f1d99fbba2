use std::collections::VecDeque;

use crate::{
    dsp::{FilterType, Oversample},
    error::{Error, Result},
};

/// Index of a stage inside its [`GraphTopology`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageId(pub usize);

/// What a stage does, with the settings it starts with.
#[derive(Debug, Clone, PartialEq)]
pub enum StageKind {
    /// Looping playback of the noise buffer.
    Source,
    /// Table waveshaper driven by the distortion curve.
    Distortion { amount: u32, oversample: Oversample },
    /// Unity gain splitting the signal across the resonator bank.
    ResonatorInput,
    /// One narrow peaking filter of the bank.
    Resonator { frequency: f32, q: f32, gain_db: f32 },
    /// Unity gain merging the bank (and its bypass) back together.
    ResonatorOutput,
    Filter {
        filter_type: FilterType,
        frequency: f32,
        q: f32,
    },
    /// Unity gain whose gain parameter receives the tremolo modulation.
    TremoloGain,
    /// Master volume.
    Gain { gain: f32 },
    Analyser { fft_size: usize },
    Destination,
    /// Shared low-frequency sine.
    Modulator { frequency: f32 },
    /// Scales the modulator for the filter-frequency route.
    ModulationDepth { gain: f32 },
    /// Scales the modulator for the tremolo route.
    TremoloDepth { gain: f32 },
}

impl StageKind {
    pub fn label(&self) -> &'static str {
        match self {
            StageKind::Source => "source",
            StageKind::Distortion { .. } => "distortion",
            StageKind::ResonatorInput => "resonator-input",
            StageKind::Resonator { .. } => "resonator",
            StageKind::ResonatorOutput => "resonator-output",
            StageKind::Filter { .. } => "filter",
            StageKind::TremoloGain => "tremolo-gain",
            StageKind::Gain { .. } => "gain",
            StageKind::Analyser { .. } => "analyser",
            StageKind::Destination => "destination",
            StageKind::Modulator { .. } => "modulator",
            StageKind::ModulationDepth { .. } => "modulation-depth",
            StageKind::TremoloDepth { .. } => "tremolo-depth",
        }
    }

    pub fn is_resonator(&self) -> bool {
        matches!(self, StageKind::Resonator { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub id: StageId,
    pub kind: StageKind,
}

/// A stage parameter that can receive a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Frequency,
    Gain,
}

/// Where a connection lands on its destination stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The stage's audio input.
    Input,
    /// One of the stage's parameters.
    Param(Param),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    pub from: StageId,
    pub to: StageId,
    pub target: Target,
}

/// Ordered stages plus the edges between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphTopology {
    stages: Vec<Stage>,
    connections: Vec<Connection>,
}

impl GraphTopology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: StageKind) -> StageId {
        let id = StageId(self.stages.len());
        self.stages.push(Stage { id, kind });
        id
    }

    pub fn connect(&mut self, from: StageId, to: StageId) {
        self.connections.push(Connection {
            from,
            to,
            target: Target::Input,
        });
    }

    pub fn connect_param(&mut self, from: StageId, to: StageId, param: Param) {
        self.connections.push(Connection {
            from,
            to,
            target: Target::Param(param),
        });
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.get(id.0)
    }

    /// First stage matching `pred`.
    pub fn find(&self, pred: impl Fn(&StageKind) -> bool) -> Option<StageId> {
        self.stages.iter().find(|s| pred(&s.kind)).map(|s| s.id)
    }

    /// Every stage matching `pred`, in insertion order.
    pub fn find_all(&self, pred: impl Fn(&StageKind) -> bool) -> Vec<StageId> {
        self.stages
            .iter()
            .filter(|s| pred(&s.kind))
            .map(|s| s.id)
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&StageKind) -> bool) -> usize {
        self.stages.iter().filter(|s| pred(&s.kind)).count()
    }

    pub fn is_connected(&self, from: StageId, to: StageId, target: Target) -> bool {
        self.connections
            .iter()
            .any(|c| c.from == from && c.to == to && c.target == target)
    }

    /// Stages feeding `id`'s audio input.
    pub fn inputs_of(&self, id: StageId) -> Vec<StageId> {
        self.connections
            .iter()
            .filter(|c| c.to == id && c.target == Target::Input)
            .map(|c| c.from)
            .collect()
    }

    /// Stages feeding parameter `param` of `id`.
    pub fn param_inputs_of(&self, id: StageId, param: Param) -> Vec<StageId> {
        self.connections
            .iter()
            .filter(|c| c.to == id && c.target == Target::Param(param))
            .map(|c| c.from)
            .collect()
    }

    /// Every stage `id` feeds, through inputs or parameters.
    pub fn outputs_of(&self, id: StageId) -> Vec<StageId> {
        self.connections
            .iter()
            .filter(|c| c.from == id)
            .map(|c| c.to)
            .collect()
    }

    /// Stages ordered so every stage comes after everything feeding it.
    pub fn topological_order(&self) -> Result<Vec<StageId>> {
        let n = self.stages.len();
        let mut indegree = vec![0usize; n];
        for c in &self.connections {
            indegree[c.to.0] += 1;
        }

        let mut ready: VecDeque<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(i) = ready.pop_front() {
            order.push(StageId(i));
            for c in self.connections.iter().filter(|c| c.from.0 == i) {
                indegree[c.to.0] -= 1;
                if indegree[c.to.0] == 0 {
                    ready.push_back(c.to.0);
                }
            }
        }

        if order.len() == n {
            Ok(order)
        } else {
            Err(Error::CyclicTopology)
        }
    }

    /// Every audio-input path from `from` to `to`, as stage lists.
    pub fn audio_paths(&self, from: StageId, to: StageId) -> Vec<Vec<StageId>> {
        let mut paths = Vec::new();
        let mut current = vec![from];
        self.walk(from, to, &mut current, &mut paths);
        paths
    }

    /// Audio paths from the source to the destination; empty when either is missing.
    pub fn paths_to_destination(&self) -> Vec<Vec<StageId>> {
        let source = self.find(|k| matches!(k, StageKind::Source));
        let dest = self.find(|k| matches!(k, StageKind::Destination));
        match (source, dest) {
            (Some(source), Some(dest)) => self.audio_paths(source, dest),
            _ => Vec::new(),
        }
    }

    fn walk(&self, at: StageId, to: StageId, current: &mut Vec<StageId>, paths: &mut Vec<Vec<StageId>>) {
        if at == to {
            paths.push(current.clone());
            return;
        }
        for c in &self.connections {
            if c.from == at && c.target == Target::Input && !current.contains(&c.to) {
                current.push(c.to);
                self.walk(c.to, to, current, paths);
                current.pop();
            }
        }
    }
}
