use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    config::SynthConfig,
    dsp::operator::Operator,
    graph::node::{wired, NodeId, SignalNode, Signals},
};

/*
Phase Modulation
================

An operator is a sine oscillator running at a ratio of the base pitch. In
phase modulation one operator's output is added to another operator's phase:

  carrier = sin(2 pi phase_c + index * modulator)

The index (the "phase amplifier") sets how far the modulator pushes the
carrier's phase. Index 0 is a plain sine. Raising it spreads energy into
sidebands at carrier +/- k * modulator frequency, so a decaying envelope on a
modulator gives the classic bright-attack, mellow-tail FM bell or e-piano.

Per operator i:

  ratio_i      frequency relative to the base pitch (0.25, 0.5, 1, 2 ...)
  index_i      phase amplifier, how hard operator i modulates whoever it feeds
  amp_i        output amplitude, usually an envelope
  phase_i      running phase, advanced every tick

Topologies
----------

  Parallel        Serial        Branch          Merge

  1   2   3         1             1           1     2
                    |            / \           \   /
                    2           2   3            3
                    |
                    3

With o_i = amp_i * sin(2 pi phase_i):

  Parallel  0.333 * (o1 + o2 + o3)                       additive, no PM
  Serial    sin(2 pi phase_3 + amp_2 index_2 *
                sin(2 pi phase_2 + amp_1 index_1 * sin(2 pi phase_1)))
  Branch    0.5 * (amp_2 sin(2 pi phase_2 + index_1 o1)
                 + amp_3 sin(2 pi phase_3 + index_1 o1))
  Merge     amp_3 sin(2 pi phase_3 + index_1 o1 + index_2 o2)

In Serial the carrier is not scaled by its own amplitude; put the voice
envelope after the combinator. Every topology reads this tick's operator
values, never last tick's.

The result is bipolar and mapped to the engine range with (v + 1) / 2.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Parallel,
    Serial,
    Branch,
    Merge,
}

impl Topology {
    pub const ALL: [Topology; 4] = [
        Topology::Parallel,
        Topology::Serial,
        Topology::Branch,
        Topology::Merge,
    ];

    /// Selector value to topology. Truncates, then clamps into range.
    pub fn from_value(value: f64) -> Self {
        let index = if value.is_nan() {
            0
        } else {
            value.clamp(0.0, 3.0) as usize
        };
        Self::ALL[index]
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

pub const DEFAULT_PHASE_AMPLIFIER: f64 = 4.0;

/// Wiring for one operator. Unwired inputs use ratio 1, the default phase
/// amplifier and amplitude 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperatorInputs {
    pub ratio: Option<NodeId>,
    pub phase_amplifier: Option<NodeId>,
    pub amplitude: Option<NodeId>,
}

impl OperatorInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ratio(mut self, id: NodeId) -> Self {
        self.ratio = Some(id);
        self
    }

    pub fn phase_amplifier(mut self, id: NodeId) -> Self {
        self.phase_amplifier = Some(id);
        self
    }

    pub fn amplitude(mut self, id: NodeId) -> Self {
        self.amplitude = Some(id);
        self
    }

    fn ids(&self) -> [Option<NodeId>; 3] {
        [self.ratio, self.phase_amplifier, self.amplitude]
    }
}

/// Resolved per-tick operator values.
#[derive(Debug, Clone, Copy)]
struct OperatorFrame {
    index: f64,
    amp: f64,
}

impl OperatorFrame {
    /// `amp * sin(2 pi phase + offset)`, offset in radians.
    #[inline]
    fn sine(&self, op: &Operator, offset: f64) -> f64 {
        self.amp * op.sine(offset / TAU)
    }
}

/// A single operator as a node: `amp * sin(2 pi phase)`, bipolar.
///
/// The phase amplifier in `inputs` is not read here; it only means something
/// inside [`ThreeOperatorPm`].
pub struct PmOsc {
    config: SynthConfig,
    op: Operator,
    frequency: NodeId,
    inputs: OperatorInputs,
}

impl PmOsc {
    pub fn new(config: SynthConfig, frequency: NodeId, inputs: OperatorInputs) -> Self {
        Self {
            config,
            op: Operator::new(config),
            frequency,
            inputs,
        }
    }
}

impl SignalNode for PmOsc {
    fn update(&mut self, _tick: u64, signals: &Signals<'_>) -> f64 {
        let base_hz = self.config.value_to_hz(signals.get(self.frequency));
        self.op.advance(base_hz, signals.get_or(self.inputs.ratio, 1.0));
        signals.get_or(self.inputs.amplitude, 1.0) * self.op.sine(0.0)
    }

    fn inputs(&self) -> Vec<NodeId> {
        let [ratio, _, amplitude] = self.inputs.ids();
        wired([Some(self.frequency), ratio, amplitude])
    }

    fn name(&self) -> &'static str {
        "pm_operator"
    }
}

pub struct ThreeOperatorPm {
    config: SynthConfig,
    frequency: NodeId,
    topology: Option<NodeId>,
    wiring: [OperatorInputs; 3],
    operators: [Operator; 3],
    current: Topology,
}

impl ThreeOperatorPm {
    pub fn new(config: SynthConfig, frequency: NodeId) -> Self {
        Self {
            config,
            frequency,
            topology: None,
            wiring: [OperatorInputs::default(); 3],
            operators: [
                Operator::new(config),
                Operator::new(config),
                Operator::new(config),
            ],
            current: Topology::Parallel,
        }
    }

    pub fn with_topology(mut self, selector: NodeId) -> Self {
        self.topology = Some(selector);
        self
    }

    /// Wire operator `n` (1, 2 or 3). Other values are ignored.
    pub fn operator(mut self, n: usize, inputs: OperatorInputs) -> Self {
        if let Some(slot) = n.checked_sub(1).and_then(|i| self.wiring.get_mut(i)) {
            *slot = inputs;
        }
        self
    }

    /// Topology used on the most recent tick.
    pub fn topology(&self) -> Topology {
        self.current
    }

    fn combine(&self, frames: &[OperatorFrame; 3]) -> f64 {
        let [op1, op2, op3] = &self.operators;
        let [f1, f2, f3] = frames;

        match self.current {
            Topology::Parallel => 0.333 * (f1.sine(op1, 0.0) + f2.sine(op2, 0.0) + f3.sine(op3, 0.0)),
            Topology::Serial => {
                let inner = f1.index * f1.sine(op1, 0.0);
                let middle = f2.index * f2.sine(op2, inner);
                op3.sine(middle / TAU)
            }
            Topology::Branch => {
                let modulation = f1.index * f1.sine(op1, 0.0);
                0.5 * (f2.sine(op2, modulation) + f3.sine(op3, modulation))
            }
            Topology::Merge => {
                let modulation = f1.index * f1.sine(op1, 0.0) + f2.index * f2.sine(op2, 0.0);
                f3.sine(op3, modulation)
            }
        }
    }
}

impl SignalNode for ThreeOperatorPm {
    fn update(&mut self, _tick: u64, signals: &Signals<'_>) -> f64 {
        let base_hz = self.config.value_to_hz(signals.get(self.frequency));
        self.current = Topology::from_value(signals.get_or(self.topology, 0.0));

        let mut frames = [OperatorFrame {
            index: 0.0,
            amp: 0.0,
        }; 3];

        for ((op, wiring), frame) in self
            .operators
            .iter_mut()
            .zip(self.wiring.iter())
            .zip(frames.iter_mut())
        {
            op.advance(base_hz, signals.get_or(wiring.ratio, 1.0));
            *frame = OperatorFrame {
                index: signals.get_or(wiring.phase_amplifier, DEFAULT_PHASE_AMPLIFIER),
                amp: signals.get_or(wiring.amplitude, 1.0),
            };
        }

        (self.combine(&frames) + 1.0) * 0.5
    }

    fn inputs(&self) -> Vec<NodeId> {
        let mut ids = vec![self.frequency];
        ids.extend(self.topology);
        for wiring in &self.wiring {
            ids.extend(wiring.ids().into_iter().flatten());
        }
        ids
    }

    fn name(&self) -> &'static str {
        "three_operator_pm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dsp::math::sin_cycles,
        graph::{control::Constant, Graph, GraphBuilder},
    };

    struct Rig {
        graph: Graph,
    }

    impl Rig {
        fn new(topology: Topology, hz: f64, ops: [(f64, f64, f64); 3]) -> Self {
            let config = SynthConfig::default();
            let mut builder = GraphBuilder::new();
            let freq = builder.add(Constant(config.hz_to_value(hz)));
            let selector = builder.add(Constant(topology.index() as f64));
            let mut pm = ThreeOperatorPm::new(config, freq).with_topology(selector);
            for (n, (ratio, index, amp)) in ops.into_iter().enumerate() {
                let inputs = OperatorInputs::new()
                    .ratio(builder.add(Constant(ratio)))
                    .phase_amplifier(builder.add(Constant(index)))
                    .amplitude(builder.add(Constant(amp)));
                pm = pm.operator(n + 1, inputs);
            }
            let out = builder.add(pm);
            builder.set_output(out);
            Self {
                graph: builder.build().expect("valid graph"),
            }
        }

        fn render(&mut self, ticks: u64) -> Vec<f64> {
            (0..ticks)
                .map(|t| {
                    self.graph.process(t);
                    self.graph.output()
                })
                .collect()
        }
    }

    /// Phases of a sine at `hz`, advanced the way the operators do it.
    fn reference_phases(hz: f64, ticks: usize) -> Vec<f64> {
        let config = SynthConfig::default();
        let base = config.value_to_hz(config.hz_to_value(hz));
        let mut op = Operator::new(config);
        (0..ticks)
            .map(|_| {
                op.advance(base, 1.0);
                op.phase()
            })
            .collect()
    }

    #[test]
    fn selector_is_clamped_and_truncated() {
        assert_eq!(Topology::from_value(-2.0), Topology::Parallel);
        assert_eq!(Topology::from_value(1.9), Topology::Serial);
        assert_eq!(Topology::from_value(2.0), Topology::Branch);
        assert_eq!(Topology::from_value(17.0), Topology::Merge);
        assert_eq!(Topology::from_value(f64::NAN), Topology::Parallel);
    }

    #[test]
    fn parallel_of_identical_operators_is_one_sine() {
        let mut rig = Rig::new(Topology::Parallel, 440.0, [(1.0, 4.0, 1.0); 3]);
        let out = rig.render(256);
        for (v, phase) in out.iter().zip(reference_phases(440.0, 256)) {
            let expected = (0.999 * sin_cycles(phase) + 1.0) * 0.5;
            assert!((v - expected).abs() < 1e-12, "{v} vs {expected}");
        }
    }

    #[test]
    fn serial_without_modulation_is_plain_carrier() {
        let mut rig = Rig::new(Topology::Serial, 330.0, [(2.0, 0.0, 1.0), (3.0, 0.0, 1.0), (1.0, 0.0, 0.1)]);
        let out = rig.render(256);
        for (v, phase) in out.iter().zip(reference_phases(330.0, 256)) {
            // carrier ignores its own amplitude in this topology
            let expected = (sin_cycles(phase) + 1.0) * 0.5;
            assert!((v - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn merge_without_modulation_is_scaled_carrier() {
        let mut rig = Rig::new(Topology::Merge, 330.0, [(2.0, 0.0, 1.0), (3.0, 0.0, 1.0), (1.0, 0.0, 0.5)]);
        let out = rig.render(256);
        for (v, phase) in out.iter().zip(reference_phases(330.0, 256)) {
            let expected = (0.5 * sin_cycles(phase) + 1.0) * 0.5;
            assert!((v - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn branch_averages_its_two_carriers() {
        let mut rig = Rig::new(Topology::Branch, 200.0, [(1.0, 0.0, 1.0), (1.0, 4.0, 1.0), (1.0, 4.0, 1.0)]);
        let out = rig.render(256);
        for (v, phase) in out.iter().zip(reference_phases(200.0, 256)) {
            let expected = (sin_cycles(phase) + 1.0) * 0.5;
            assert!((v - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn modulation_changes_the_waveform_and_stays_in_range() {
        for topology in Topology::ALL {
            let mut plain = Rig::new(topology, 220.0, [(1.0, 0.0, 1.0); 3]);
            let mut modulated = Rig::new(topology, 220.0, [(2.0, 3.0, 1.0), (1.0, 3.0, 1.0), (1.0, 3.0, 1.0)]);
            let a = plain.render(2_000);
            let b = modulated.render(2_000);
            assert!(b.iter().all(|v| (0.0..=1.0).contains(v)), "{topology:?} left [0, 1]");
            if topology != Topology::Parallel {
                let diff: f64 = a.iter().zip(&b).map(|(x, y)| (x - y).abs()).sum();
                assert!(diff > 1.0, "{topology:?} ignored its modulators");
            }
        }
    }

    #[test]
    fn single_operator_node_is_bipolar() {
        let config = SynthConfig::default();
        let mut builder = GraphBuilder::new();
        let freq = builder.add(Constant(config.hz_to_value(1_000.0)));
        let amp = builder.add(Constant(0.5));
        let op = builder.add(PmOsc::new(config, freq, OperatorInputs::new().amplitude(amp)));
        builder.set_output(op);
        let mut graph = builder.build().expect("valid graph");

        let mut min: f64 = 0.0;
        let mut max: f64 = 0.0;
        for t in 0..480 {
            graph.process(t);
            min = min.min(graph.output());
            max = max.max(graph.output());
        }
        assert!(min < -0.49 && max > 0.49 && max <= 0.5 && min >= -0.5);
    }
}
