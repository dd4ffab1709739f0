use crate::{
    config::SynthConfig,
    dsp::filter::ResonantLowpass,
    graph::node::{wired, NodeId, SignalNode, Signals},
};

/*
Resonant Low-Pass Node
======================

Subtractive synthesis starts from a harmonically rich waveform (saw, pulse)
and carves harmonics away. The low-pass passes everything below the cutoff
and rolls off above it at 12 dB/octave.

Parameters:
-----------

Cutoff: normalized frequency (0..1 of Nyquist). Usually wired to an
  envelope so the tone opens on the attack and closes on the release:
  0.0    closed (silence past DC)
  0.02   ~480 Hz, muffled
  0.2    ~4.8 kHz, present
  1.0    fully open

Resonance: 0..1, emphasis around the cutoff.
  0.0    flat (Butterworth)
  0.5    clear peak
  0.9+   whistling, nearly self-oscillating

Example usage:
  let mix    = builder.add(Mixer3::new().input(0, saw).input(1, square));
  let cutoff = builder.add(AdsrNode::new(config, gate));
  let res    = builder.add(Constant(0.9));
  let lpf    = builder.add(LowpassNode::new(config, mix, cutoff).with_resonance(res));
*/

pub struct LowpassNode {
    filter: ResonantLowpass,
    input: NodeId,
    cutoff: NodeId,
    resonance: Option<NodeId>,
}

impl LowpassNode {
    pub fn new(config: SynthConfig, input: NodeId, cutoff: NodeId) -> Self {
        Self {
            filter: ResonantLowpass::new(config),
            input,
            cutoff,
            resonance: None,
        }
    }

    pub fn with_resonance(mut self, resonance: NodeId) -> Self {
        self.resonance = Some(resonance);
        self
    }

    pub fn coefficient_updates(&self) -> u64 {
        self.filter.coefficient_updates()
    }
}

impl SignalNode for LowpassNode {
    fn update(&mut self, _tick: u64, signals: &Signals<'_>) -> f64 {
        self.filter.next(
            signals.get(self.input),
            signals.get(self.cutoff),
            signals.get_or(self.resonance, 0.0),
        )
    }

    fn inputs(&self) -> Vec<NodeId> {
        wired([Some(self.input), Some(self.cutoff), self.resonance])
    }

    fn name(&self) -> &'static str {
        "lowpass"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{
        control::{Constant, Control},
        GraphBuilder,
    };

    #[test]
    fn smooths_a_step() {
        let config = SynthConfig::default();
        let input = Control::new(0.0);
        let mut builder = GraphBuilder::new();
        let source = builder.add(input.node());
        let cutoff = builder.add(Constant(config.hz_to_value(100.0)));
        let lpf = builder.add(LowpassNode::new(config, source, cutoff));
        builder.set_output(lpf);
        let mut graph = builder.build().expect("valid graph");

        graph.process(0);
        input.set(1.0);
        graph.process(1);
        let first = graph.output();
        assert!(first > 0.0 && first < 0.01, "step leaked through: {first}");

        let mut last = first;
        for tick in 2..4_800 {
            graph.process(tick);
            assert!(graph.output() >= last - 1e-9);
            last = graph.output();
        }
        assert!(last > 0.99);
    }
}
