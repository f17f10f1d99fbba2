use super::{EngineMessage, GraphRenderer, MessageReceiver, SampleSink};

/// Audio-thread side of the engine.
///
/// Owns the active renderer (if any) and applies control messages at the
/// start of every block. The scope tap survives stop/start and rebuilds by
/// moving from the old renderer to the new one.
pub struct Player<R: MessageReceiver> {
    rx: R,
    renderer: Option<Box<GraphRenderer>>,
    parked_tap: Option<Box<dyn SampleSink>>,
}

impl<R: MessageReceiver> Player<R> {
    pub fn new(rx: R) -> Self {
        Self {
            rx,
            renderer: None,
            parked_tap: None,
        }
    }

    /// Tap that receives everything the analyser stage sees.
    pub fn with_scope_tap(mut self, sink: Box<dyn SampleSink>) -> Self {
        self.parked_tap = Some(sink);
        self
    }

    pub fn is_playing(&self) -> bool {
        self.renderer.is_some()
    }

    pub fn receiver_mut(&mut self) -> &mut R {
        &mut self.rx
    }

    pub fn renderer(&self) -> Option<&GraphRenderer> {
        self.renderer.as_deref()
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        while let Some(msg) = self.rx.pop() {
            self.handle(msg);
        }

        match self.renderer.as_mut() {
            Some(renderer) => renderer.render_block(out),
            None => out.fill(0.0),
        }
    }

    fn handle(&mut self, msg: EngineMessage) {
        match msg {
            EngineMessage::Start(mut next) => {
                let tap = self
                    .renderer
                    .take()
                    .and_then(|mut old| old.take_scope_tap())
                    .or_else(|| self.parked_tap.take());
                if let Some(tap) = tap {
                    next.set_scope_tap(tap);
                }
                self.renderer = Some(next);
            }
            EngineMessage::Stop => {
                if let Some(mut old) = self.renderer.take() {
                    if let Some(tap) = old.take_scope_tap() {
                        self.parked_tap = Some(tap);
                    }
                }
            }
            EngineMessage::Update(scalars) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.apply_scalars(&scalars);
                }
            }
            EngineMessage::Curve(curve) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.set_curve(*curve);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Arc};

    use super::*;
    use crate::{
        dsp::{noise::synthesize, DistortionCurve},
        graph::planner::plan,
        patch::ParameterSet,
    };

    fn renderer() -> Box<GraphRenderer> {
        let params = ParameterSet::default();
        let buffer = Arc::new(synthesize(params.noise_kind, 2_048, 48_000.0));
        let curve = DistortionCurve::build(params.distortion_amount as f32);
        Box::new(GraphRenderer::new(buffer, &curve, &plan(&params), 48_000.0).unwrap())
    }

    struct Count(usize);

    impl SampleSink for Count {
        fn push(&mut self, _sample: f32) -> bool {
            self.0 += 1;
            true
        }
    }

    #[test]
    fn silent_until_started_and_after_stop() {
        let mut player = Player::new(VecDeque::<EngineMessage>::new());
        let mut out = vec![1.0f32; 128];
        player.render_block(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));

        player.receiver_mut().push_back(EngineMessage::Start(renderer()));
        player.render_block(&mut out);
        assert!(player.is_playing());
        assert!(out.iter().any(|&s| s != 0.0));

        player.receiver_mut().push_back(EngineMessage::Stop);
        player.render_block(&mut out);
        assert!(!player.is_playing());
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn tap_moves_across_restarts() {
        let mut player = Player::new(VecDeque::<EngineMessage>::new()).with_scope_tap(Box::new(Count(0)));
        player.receiver_mut().push_back(EngineMessage::Start(renderer()));
        player.receiver_mut().push_back(EngineMessage::Start(renderer()));
        player.receiver_mut().push_back(EngineMessage::Stop);
        player.receiver_mut().push_back(EngineMessage::Start(renderer()));

        let mut out = vec![0.0f32; 16];
        player.render_block(&mut out);
        assert!(player.parked_tap.is_none());

        let mut renderer = player.renderer.take().unwrap();
        assert!(renderer.take_scope_tap().is_some());
    }

    #[test]
    fn updates_without_renderer_are_ignored() {
        let mut player = Player::new(VecDeque::<EngineMessage>::new());
        let params = ParameterSet::default();
        player.receiver_mut().push_back(EngineMessage::Update(params.scalars()));
        player
            .receiver_mut()
            .push_back(EngineMessage::Curve(Box::new(DistortionCurve::build(1.0))));

        let mut out = vec![0.0f32; 16];
        player.render_block(&mut out);
        assert!(!player.is_playing());
    }
}
