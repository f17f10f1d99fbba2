use rtrb::{Consumer, Producer, RingBuffer};

use crate::dsp::analyser::Analyser;

/// UI end of the audio → UI sample ring.
///
/// Drains whatever the analyser stage pushed since the last tick into a
/// local [`Analyser`] window.
pub struct ScopeTap {
    rx: Consumer<f32>,
    analyser: Analyser,
    stopped: bool,
}

/// Create the scope ring. The producer goes to the engine as its
/// [`SampleSink`](crate::engine::SampleSink).
pub fn scope_ring(capacity: usize, fft_size: usize, sample_rate: f32) -> (Producer<f32>, ScopeTap) {
    let (tx, rx) = RingBuffer::new(capacity.max(1));
    let tap = ScopeTap {
        rx,
        analyser: Analyser::new(fft_size, sample_rate),
        stopped: false,
    };
    (tx, tap)
}

impl ScopeTap {
    /// Move pending samples into the window. Returns how many arrived.
    ///
    /// A stopped tap still drains the ring so stale audio never shows up
    /// after a restart, but reports nothing.
    pub fn poll(&mut self) -> usize {
        let available = self.rx.slots();
        if available == 0 {
            return 0;
        }

        let Ok(chunk) = self.rx.read_chunk(available) else {
            return 0;
        };
        let (first, second) = chunk.as_slices();
        if !self.stopped {
            self.analyser.push(first);
            self.analyser.push(second);
        }
        chunk.commit_all();

        if self.stopped {
            0
        } else {
            available
        }
    }

    /// Stop reporting samples and clear the window. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.analyser.clear();
    }

    pub fn resume(&mut self) {
        self.stopped = false;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn analyser(&self) -> &Analyser {
        &self.analyser
    }

    pub fn analyser_mut(&mut self) -> &mut Analyser {
        &mut self.analyser
    }
}
