#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use std::collections::VecDeque;

use crate::{
    dsp::DistortionCurve,
    engine::{EngineMessage, GraphRenderer, Player},
    error::Result,
    patch::ScalarParams,
};

#[cfg(feature = "rtrb")]
use crate::error::Error;

/// Something that can play a renderer.
pub trait AudioHost {
    fn start(&mut self, renderer: Box<GraphRenderer>) -> Result<()>;

    fn stop(&mut self) -> Result<()>;

    /// In-place parameter change. `curve` is set when the distortion
    /// amount changed.
    fn update(&mut self, scalars: ScalarParams, curve: Option<DistortionCurve>) -> Result<()>;
}

/// Control end of an engine message ring.
#[cfg(feature = "rtrb")]
pub struct RingHost {
    tx: Producer<EngineMessage>,
}

/// Create a message ring: the host for the control thread, the player for
/// the audio callback.
#[cfg(feature = "rtrb")]
pub fn ring_host(capacity: usize) -> (RingHost, Player<Consumer<EngineMessage>>) {
    let (tx, rx) = RingBuffer::new(capacity.max(4));
    (RingHost { tx }, Player::new(rx))
}

#[cfg(feature = "rtrb")]
impl RingHost {
    fn send(&mut self, msg: EngineMessage) -> Result<()> {
        self.tx
            .push(msg)
            .map_err(|_| Error::Host("engine message queue is full".to_string()))
    }
}

#[cfg(feature = "rtrb")]
impl AudioHost for RingHost {
    fn start(&mut self, renderer: Box<GraphRenderer>) -> Result<()> {
        self.send(EngineMessage::Start(renderer))
    }

    fn stop(&mut self) -> Result<()> {
        self.send(EngineMessage::Stop)
    }

    fn update(&mut self, scalars: ScalarParams, curve: Option<DistortionCurve>) -> Result<()> {
        if self.tx.slots() < 2 {
            return Err(Error::Host("engine message queue is full".to_string()));
        }
        if let Some(curve) = curve {
            self.send(EngineMessage::Curve(Box::new(curve)))?;
        }
        self.send(EngineMessage::Update(scalars))
    }
}

/// Host without a device: the caller pulls blocks with [`OfflineHost::render`].
pub struct OfflineHost {
    player: Player<VecDeque<EngineMessage>>,
}

impl OfflineHost {
    pub fn new() -> Self {
        Self {
            player: Player::new(VecDeque::new()),
        }
    }

    pub fn render(&mut self, out: &mut [f32]) {
        self.player.render_block(out);
    }

    /// True once a queued start has been rendered and not stopped since.
    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    pub fn player(&self) -> &Player<VecDeque<EngineMessage>> {
        &self.player
    }
}

impl Default for OfflineHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioHost for OfflineHost {
    fn start(&mut self, renderer: Box<GraphRenderer>) -> Result<()> {
        self.player.receiver_mut().push_back(EngineMessage::Start(renderer));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.player.receiver_mut().push_back(EngineMessage::Stop);
        Ok(())
    }

    fn update(&mut self, scalars: ScalarParams, curve: Option<DistortionCurve>) -> Result<()> {
        let queue = self.player.receiver_mut();
        if let Some(curve) = curve {
            queue.push_back(EngineMessage::Curve(Box::new(curve)));
        }
        queue.push_back(EngineMessage::Update(scalars));
        Ok(())
    }
}
