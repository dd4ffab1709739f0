use rtrb::{Consumer, Producer, RingBuffer};
use tracing::debug;

use crate::graph::node::{NodeId, SignalNode, Signals};

/// Ticks between captured samples.
pub const DEFAULT_SCOPE_DELAY: u64 = 64;
/// Samples a display typically shows at once.
pub const SCOPE_WAVE_SIZE: usize = 100;

/// Pass-through tap that feeds a decimated copy of its input to a display.
///
/// Every `delay` ticks the input is pushed, as a bipolar `2v - 1`, into a
/// queue another thread may drain. When the queue is full the sample is
/// dropped; the render thread never waits on the display.
pub struct ScopeNode {
    input: NodeId,
    delay: u64,
    countdown: u64,
    queue: Producer<f64>,
    dropped: u64,
}

impl ScopeNode {
    pub fn new(input: NodeId, delay: u64, capacity: usize) -> (Self, Consumer<f64>) {
        let (queue, consumer) = RingBuffer::new(capacity.max(1));
        let delay = delay.max(1);
        let node = Self {
            input,
            delay,
            countdown: delay,
            queue,
            dropped: 0,
        };
        (node, consumer)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl SignalNode for ScopeNode {
    fn update(&mut self, _tick: u64, signals: &Signals<'_>) -> f64 {
        let value = signals.get(self.input);
        self.countdown -= 1;
        if self.countdown == 0 {
            self.countdown = self.delay;
            if self.queue.push(2.0 * value - 1.0).is_err() {
                self.dropped += 1;
                if self.dropped.is_power_of_two() {
                    debug!(dropped = self.dropped, "scope queue full, dropping samples");
                }
            }
        }
        value
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.input]
    }

    fn name(&self) -> &'static str {
        "scope"
    }
}
