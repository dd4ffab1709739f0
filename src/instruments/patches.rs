//! Ready-made instruments.
//!
//! Each function assembles a complete voice around a MIDI source and hands
//! back the built graph together with the controls a front end can turn. The
//! graph's output is a scope tap on the final amplifier, so a display can
//! follow the waveform through [`Patch::scope`].

use rtrb::Consumer;
use tracing::info;

use crate::{
    config::SynthConfig,
    dsp::envelope::AdsrParams,
    error::GraphError,
    graph::{
        amplify::Amplifier,
        control::{Control, Scaler},
        envelope::AdsrNode,
        filter::LowpassNode,
        midi::{add_midi, MidiNodes},
        mix::Mixer3,
        oscillator::{PulseOsc, SawOsc},
        pm::{OperatorInputs, ThreeOperatorPm, Topology},
        scope::{ScopeNode, DEFAULT_SCOPE_DELAY, SCOPE_WAVE_SIZE},
        Graph, GraphBuilder, NodeId,
    },
    instruments::organ::{DrawbarOrgan, DEFAULT_DRAWBAR_LEVEL},
    io::midi::MidiSource,
};

const SCOPE_CAPACITY: usize = SCOPE_WAVE_SIZE * 8;

/// Option lists for ratios and phase amplifiers step by 0.25 from 0.25:
/// index `i` means `0.25 * (i + 1)`.
const OPTION_STEP: f64 = 0.25;
const OPTION_OFFSET: f64 = 1.0;
/// Index of 1.00 in those lists.
pub const UNITY_OPTION: f64 = 3.0;

/// A built voice plus its knobs.
pub struct Patch<C> {
    pub graph: Graph,
    pub controls: C,
    pub scope: Consumer<f64>,
    pub midi: MidiNodes,
}

/// Four knobs for one ADSR.
#[derive(Debug, Clone)]
pub struct EnvelopeControls {
    pub attack: Control,
    pub decay: Control,
    pub sustain: Control,
    pub release: Control,
}

impl EnvelopeControls {
    pub fn new(params: AdsrParams) -> Self {
        Self {
            attack: Control::new(params.attack),
            decay: Control::new(params.decay),
            sustain: Control::new(params.sustain),
            release: Control::new(params.release),
        }
    }

    fn wire(&self, builder: &mut GraphBuilder, config: SynthConfig, gate: NodeId) -> AdsrNode {
        AdsrNode::new(config, gate)
            .attack(builder.add(self.attack.node()))
            .decay(builder.add(self.decay.node()))
            .sustain(builder.add(self.sustain.node()))
            .release(builder.add(self.release.node()))
    }
}

fn finish<C>(
    mut builder: GraphBuilder,
    output: NodeId,
    controls: C,
    midi: MidiNodes,
    patch: &str,
) -> Result<Patch<C>, GraphError> {
    let (scope, display) = ScopeNode::new(output, DEFAULT_SCOPE_DELAY, SCOPE_CAPACITY);
    let tap = builder.add(scope);
    builder.set_output(tap);
    let graph = builder.build()?;
    info!(patch, nodes = graph.len(), "patch ready");
    Ok(Patch {
        graph,
        controls,
        scope: display,
        midi,
    })
}

#[derive(Debug, Clone)]
pub struct OrganControls {
    /// 16' through 1', levels 0..=8.
    pub drawbars: [Control; 9],
    /// Index into the factory preset table.
    pub preset: Control,
    pub envelope: EnvelopeControls,
    pub gain: Control,
}

/// Drawbar organ through a gain-scaled ADSR.
pub fn organ<S: MidiSource + 'static>(config: SynthConfig, source: S) -> Result<Patch<OrganControls>, GraphError> {
    let controls = OrganControls {
        drawbars: std::array::from_fn(|_| Control::new(DEFAULT_DRAWBAR_LEVEL)),
        preset: Control::new(0.0),
        envelope: EnvelopeControls::new(AdsrParams::new(0.1, 0.1, 1.0, 0.4)),
        gain: Control::new(1.0),
    };

    let mut builder = GraphBuilder::new();
    let midi = add_midi(&mut builder, config, source);

    let gain = builder.add(controls.gain.node());
    let adsr = controls.envelope.wire(&mut builder, config, midi.gate).multiplier(gain);
    let adsr = builder.add(adsr);

    let preset = builder.add(controls.preset.node());
    let mut organ = DrawbarOrgan::new(config, midi.pitch).with_preset(preset);
    for (n, drawbar) in controls.drawbars.iter().enumerate() {
        organ = organ.drawbar(n, builder.add(drawbar.node()));
    }
    let organ = builder.add(organ);
    let amp = builder.add(Amplifier::new(organ, adsr));

    finish(builder, amp, controls, midi, "organ")
}

#[derive(Debug, Clone)]
pub struct SubtractiveControls {
    pub square_level: Control,
    pub saw_level: Control,
    pub duty: Control,
    pub resonance: Control,
    pub filter_envelope: EnvelopeControls,
    pub amp_envelope: EnvelopeControls,
}

/// Pulse and saw, mixed, through an enveloped resonant low-pass.
pub fn subtractive<S: MidiSource + 'static>(
    config: SynthConfig,
    source: S,
) -> Result<Patch<SubtractiveControls>, GraphError> {
    let envelope = AdsrParams::new(0.1, 0.2, 0.8, 1.0);
    let controls = SubtractiveControls {
        square_level: Control::new(1.0),
        saw_level: Control::new(1.0),
        duty: Control::new(0.5),
        resonance: Control::new(0.9),
        filter_envelope: EnvelopeControls::new(envelope),
        amp_envelope: EnvelopeControls::new(envelope),
    };

    let mut builder = GraphBuilder::new();
    let midi = add_midi(&mut builder, config, source);

    let amp_env = controls.amp_envelope.wire(&mut builder, config, midi.gate);
    let amp_env = builder.add(amp_env);
    let filter_env = controls.filter_envelope.wire(&mut builder, config, midi.gate);
    let filter_env = builder.add(filter_env);

    let duty = builder.add(controls.duty.node());
    let square = builder.add(PulseOsc::new(config, midi.pitch).with_duty(duty));
    let saw = builder.add(SawOsc::new(config, midi.pitch));

    let square_level = builder.add(controls.square_level.node());
    let saw_level = builder.add(controls.saw_level.node());
    let mix = builder.add(
        Mixer3::new()
            .input(0, square)
            .amplitude(0, square_level)
            .input(1, saw)
            .amplitude(1, saw_level),
    );

    let resonance = builder.add(controls.resonance.node());
    let lpf = builder.add(LowpassNode::new(config, mix, filter_env).with_resonance(resonance));
    let amp = builder.add(Amplifier::new(lpf, amp_env));

    finish(builder, amp, controls, midi, "subtractive")
}

/// Option indices for one operator plus its envelope.
#[derive(Debug, Clone)]
pub struct OperatorControls {
    /// Ratio option index, `0.25 * (i + 1)`.
    pub ratio: Control,
    /// Phase amplifier option index, `0.25 * (i + 1)`.
    pub phase_amplifier: Control,
    pub envelope: EnvelopeControls,
}

#[derive(Debug, Clone)]
pub struct PhaseModControls {
    /// Topology index, see [`Topology::from_value`].
    pub topology: Control,
    pub operators: [OperatorControls; 3],
    pub master: EnvelopeControls,
}

/// Three-operator phase modulation with a master envelope.
pub fn phase_mod<S: MidiSource + 'static>(
    config: SynthConfig,
    source: S,
) -> Result<Patch<PhaseModControls>, GraphError> {
    let envelope = AdsrParams::new(0.1, 1.0, 0.3, 1.0);
    let controls = PhaseModControls {
        topology: Control::new(Topology::Serial.index() as f64),
        operators: std::array::from_fn(|_| OperatorControls {
            ratio: Control::new(UNITY_OPTION),
            phase_amplifier: Control::new(UNITY_OPTION),
            envelope: EnvelopeControls::new(envelope),
        }),
        master: EnvelopeControls::new(envelope),
    };

    let mut builder = GraphBuilder::new();
    let midi = add_midi(&mut builder, config, source);

    let topology = builder.add(controls.topology.node());
    let mut pm = ThreeOperatorPm::new(config, midi.pitch).with_topology(topology);
    for (n, op) in controls.operators.iter().enumerate() {
        let ratio = builder.add(op.ratio.node());
        let ratio = builder.add(Scaler::new(ratio, OPTION_STEP, OPTION_OFFSET));
        let index = builder.add(op.phase_amplifier.node());
        let index = builder.add(Scaler::new(index, OPTION_STEP, OPTION_OFFSET));
        let env = op.envelope.wire(&mut builder, config, midi.gate);
        let env = builder.add(env);
        pm = pm.operator(
            n + 1,
            OperatorInputs::new().ratio(ratio).phase_amplifier(index).amplitude(env),
        );
    }
    let pm = builder.add(pm);

    let master = controls.master.wire(&mut builder, config, midi.gate);
    let master = builder.add(master);
    let amp = builder.add(Amplifier::new(pm, master));

    finish(builder, amp, controls, midi, "phase_mod")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::midi::{midi_queue, MidiEvent};

    fn render<C>(patch: &mut Patch<C>, from: u64, ticks: u64) -> Vec<f64> {
        (from..from + ticks)
            .map(|tick| {
                patch.graph.process(tick);
                patch.graph.output()
            })
            .collect()
    }

    #[test]
    fn organ_is_silent_until_a_key_is_pressed() {
        let (mut keys, rx) = midi_queue();
        let mut patch = organ(SynthConfig::default(), rx).expect("organ builds");

        let idle = render(&mut patch, 0, 480);
        assert!(idle.iter().all(|&v| v == 0.0));

        keys.push(MidiEvent::NoteOn { note: 60, velocity: 100 }).expect("room");
        let held = render(&mut patch, 480, 9_600);
        assert!(held.iter().any(|&v| v > 0.1));
        assert!(held.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn organ_preset_control_reaches_the_graph() {
        let (_keys, rx) = midi_queue();
        let mut patch = organ(SynthConfig::default(), rx).expect("organ builds");
        render(&mut patch, 0, 1);
        patch.controls.preset.set(4.0);
        render(&mut patch, 1, 1);
        assert_eq!(patch.graph.name(patch.graph.output_id()), "scope");
    }

    #[test]
    fn subtractive_stays_in_range() {
        let (mut keys, rx) = midi_queue();
        let mut patch = subtractive(SynthConfig::default(), rx).expect("subtractive builds");
        keys.push(MidiEvent::NoteOn { note: 45, velocity: 100 }).expect("room");
        let out = render(&mut patch, 0, 24_000);
        assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(out.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn phase_mod_releases_to_silence() {
        let config = SynthConfig::default();
        let (mut keys, rx) = midi_queue();
        let mut patch = phase_mod(config, rx).expect("phase_mod builds");
        keys.push(MidiEvent::NoteOn { note: 57, velocity: 100 }).expect("room");
        let held = render(&mut patch, 0, 4_800);
        assert!(held.iter().any(|&v| v > 0.05));

        keys.push(MidiEvent::NoteOff { note: 57 }).expect("room");
        let release = config.seconds_to_ticks(1.0);
        let tail = render(&mut patch, 4_800, release + 10);
        assert_eq!(tail.last().copied(), Some(0.0));
    }

    #[test]
    fn scope_sees_the_output() {
        let (mut keys, rx) = midi_queue();
        let mut patch = organ(SynthConfig::default(), rx).expect("organ builds");
        keys.push(MidiEvent::NoteOn { note: 69, velocity: 100 }).expect("room");
        render(&mut patch, 0, DEFAULT_SCOPE_DELAY * 4);
        assert_eq!(patch.scope.slots(), 4);
    }
}
