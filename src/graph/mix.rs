use crate::graph::node::{NodeId, SignalNode, Signals};

/*
Three-Way Mixer
===============

  out = 0.2 * (a1*i1 + a2*i2 + a3*i3)

Up to three sources, each with its own amplitude node. Unwired sources count
as silence and unwired amplitudes as 1.0.

The fixed 0.2 is headroom. Three unipolar sources at full amplitude sum to
3.0; scaled by 0.2 that stays at 0.6, leaving room for a resonant filter
downstream to peak without hitting the clamp immediately. Mixing two full
oscillators lands at 0.4, so expect to make the level up later (envelope
multiplier, volume control).
*/

const HEADROOM: f64 = 0.2;

#[derive(Default)]
pub struct Mixer3 {
    sources: [Option<NodeId>; 3],
    amplitudes: [Option<NodeId>; 3],
}

impl Mixer3 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire source `slot` (0, 1 or 2). Out-of-range slots are ignored.
    pub fn input(mut self, slot: usize, source: NodeId) -> Self {
        if let Some(entry) = self.sources.get_mut(slot) {
            *entry = Some(source);
        }
        self
    }

    pub fn amplitude(mut self, slot: usize, amplitude: NodeId) -> Self {
        if let Some(entry) = self.amplitudes.get_mut(slot) {
            *entry = Some(amplitude);
        }
        self
    }
}

impl SignalNode for Mixer3 {
    fn update(&mut self, _tick: u64, signals: &Signals<'_>) -> f64 {
        let sum: f64 = self
            .sources
            .iter()
            .zip(self.amplitudes.iter())
            .map(|(&source, &amplitude)| signals.get_or(source, 0.0) * signals.get_or(amplitude, 1.0))
            .sum();
        HEADROOM * sum
    }

    fn inputs(&self) -> Vec<NodeId> {
        self.sources
            .iter()
            .chain(self.amplitudes.iter())
            .flatten()
            .copied()
            .collect()
    }

    fn name(&self) -> &'static str {
        "mixer3"
    }
}
