use ticksynth::{
    graph::{
        amplify::Amplifier,
        control::{Constant, Control},
        envelope::AdsrNode,
        filter::LowpassNode,
        mix::Mixer3,
        oscillator::{PulseOsc, SawOsc},
        Signals,
    },
    GraphBuilder, GraphError, NodeId, SignalNode, SynthConfig,
};

/// Records the tick it last saw from each input, to check evaluation order.
struct Probe {
    inputs: Vec<NodeId>,
}

impl SignalNode for Probe {
    fn update(&mut self, tick: u64, signals: &Signals<'_>) -> f64 {
        for &input in &self.inputs {
            assert_eq!(signals.get(input), tick as f64, "read a stale upstream value");
        }
        tick as f64
    }

    fn inputs(&self) -> Vec<NodeId> {
        self.inputs.clone()
    }
}

#[test]
fn producers_run_before_consumers() {
    let mut builder = GraphBuilder::new();
    let late = builder.reserve();
    let a = builder.add(Probe { inputs: vec![] });
    let b = builder.add(Probe { inputs: vec![a, late] });
    builder.fill(late, Probe { inputs: vec![a] });
    builder.set_output(b);
    let mut graph = builder.build().expect("acyclic");

    for tick in 0..8 {
        graph.process(tick);
    }
    assert_eq!(graph.output(), 7.0);
}

#[test]
fn cycles_are_rejected() {
    let mut builder = GraphBuilder::new();
    let a = builder.reserve();
    let b = builder.add(Amplifier::new(a, a));
    builder.fill(a, Amplifier::new(b, b));
    builder.set_output(a);
    assert!(matches!(builder.build(), Err(GraphError::Cycle(_))));
}

#[test]
fn subtractive_chain_by_hand() {
    let config = SynthConfig::default();
    let gate = Control::new(0.0);
    let mut builder = GraphBuilder::new();
    let pitch = builder.add(Constant(config.hz_to_value(110.0)));
    let gate_id = builder.add(gate.node());
    let square = builder.add(PulseOsc::new(config, pitch));
    let saw = builder.add(SawOsc::new(config, pitch));
    let mix = builder.add(Mixer3::new().input(0, square).input(1, saw));
    let cutoff = builder.add(Constant(0.1));
    let lpf = builder.add(LowpassNode::new(config, mix, cutoff));
    let env = builder.add(AdsrNode::new(config, gate_id));
    let out = builder.add(Amplifier::new(lpf, env));
    builder.set_output(out);
    let mut graph = builder.build().expect("acyclic");

    gate.set(1.0);
    let mut peak: f64 = 0.0;
    for tick in 0..48_000 {
        graph.process(tick);
        let v = graph.output();
        assert!((0.0..=1.0).contains(&v));
        peak = peak.max(v);
    }
    assert!(peak > 0.05);
}
