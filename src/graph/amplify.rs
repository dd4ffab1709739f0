use crate::graph::node::{NodeId, SignalNode, Signals};

/// `signal * modulator`: an envelope on a voice, a volume knob, ring modulation.
pub struct Amplifier {
    pub signal: NodeId,
    pub modulator: NodeId,
}

impl Amplifier {
    pub fn new(signal: NodeId, modulator: NodeId) -> Self {
        Self { signal, modulator }
    }
}

impl SignalNode for Amplifier {
    fn update(&mut self, _tick: u64, signals: &Signals<'_>) -> f64 {
        signals.get(self.signal) * signals.get(self.modulator)
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.signal, self.modulator]
    }

    fn name(&self) -> &'static str {
        "amplifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{control::Constant, GraphBuilder};

    #[test]
    fn multiplies_inputs() {
        let mut builder = GraphBuilder::new();
        let a = builder.add(Constant(0.8));
        let b = builder.add(Constant(0.5));
        let amp = builder.add(Amplifier::new(a, b));
        builder.set_output(amp);
        let mut graph = builder.build().expect("valid graph");
        graph.process(0);
        assert_eq!(graph.output(), 0.4);
    }
}
