#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use std::collections::VecDeque;

use super::GraphRenderer;
use crate::{dsp::DistortionCurve, patch::ScalarParams};

/// Control → audio commands.
///
/// Anything that allocates (renderers, curve tables) is built on the
/// control thread and moved across boxed.
pub enum EngineMessage {
    /// Replace whatever is playing with a new graph.
    Start(Box<GraphRenderer>),
    Stop,
    /// In-place scalar changes to the running graph.
    Update(ScalarParams),
    /// Pre-built curve for a changed distortion amount. Sent before the
    /// matching `Update` so the audio thread never builds a table.
    Curve(Box<DistortionCurve>),
}

impl std::fmt::Debug for EngineMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineMessage::Start(r) => f.debug_tuple("Start").field(&r.stage_count()).finish(),
            EngineMessage::Stop => f.write_str("Stop"),
            EngineMessage::Update(s) => f.debug_tuple("Update").field(s).finish(),
            EngineMessage::Curve(c) => f.debug_tuple("Curve").field(&c.amount()).finish(),
        }
    }
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<EngineMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<EngineMessage> {
    fn pop(&mut self) -> Option<EngineMessage> {
        Consumer::pop(self).ok()
    }
}

impl MessageReceiver for VecDeque<EngineMessage> {
    fn pop(&mut self) -> Option<EngineMessage> {
        self.pop_front()
    }
}
