use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tracing::trace;

use crate::{
    config::SynthConfig,
    graph::{
        node::{NodeId, SignalNode, Signals},
        GraphBuilder,
    },
    io::midi::{MidiSource, MidiState},
};

/*
MIDI Adapter
============

Turns a stream of keyboard events into two control signals:

  pitch  normalized frequency of the held note, bend applied
  gate   1 while a key is held, 0 otherwise

  MidiSource ──poll──► MidiPitchNode ──► pitch
                            │
                            └── gate flag ──► MidiGateNode ──► gate

The pitch node owns the source and the keyboard state and drains every queued
event once per tick. The gate node reads the flag the pitch node just wrote;
it lists the pitch node as its input so it always runs after it.
*/

pub struct MidiPitchNode<S: MidiSource> {
    source: S,
    state: MidiState,
    config: SynthConfig,
    pitch: f64,
    gate: Arc<AtomicBool>,
}

impl<S: MidiSource> MidiPitchNode<S> {
    pub fn new(config: SynthConfig, source: S) -> Self {
        let state = MidiState::new(config.invert_bend_msb);
        Self {
            pitch: config.hz_to_value(state.frequency_hz()),
            source,
            state,
            config,
            gate: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Companion node exposing this adapter's gate.
    pub fn gate_node(&self, pitch: NodeId) -> MidiGateNode {
        MidiGateNode {
            pitch,
            gate: Arc::clone(&self.gate),
        }
    }

    pub fn state(&self) -> &MidiState {
        &self.state
    }
}

impl<S: MidiSource> SignalNode for MidiPitchNode<S> {
    fn update(&mut self, _tick: u64, _signals: &Signals<'_>) -> f64 {
        let mut changed = false;
        while let Some(event) = self.source.poll() {
            trace!(?event, "midi");
            self.state.apply(event);
            changed = true;
        }
        if changed {
            self.pitch = self.config.hz_to_value(self.state.frequency_hz());
            self.gate.store(self.state.gate(), Ordering::Relaxed);
        }
        self.pitch
    }

    fn inputs(&self) -> Vec<NodeId> {
        Vec::new()
    }

    fn name(&self) -> &'static str {
        "midi_pitch"
    }
}

pub struct MidiGateNode {
    pitch: NodeId,
    gate: Arc<AtomicBool>,
}

impl SignalNode for MidiGateNode {
    fn update(&mut self, _tick: u64, _signals: &Signals<'_>) -> f64 {
        if self.gate.load(Ordering::Relaxed) {
            1.0
        } else {
            0.0
        }
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.pitch]
    }

    fn name(&self) -> &'static str {
        "midi_gate"
    }
}

/// Ids of the adapter's two outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiNodes {
    pub pitch: NodeId,
    pub gate: NodeId,
}

/// Add a pitch/gate pair reading from `source`.
pub fn add_midi<S: MidiSource + 'static>(builder: &mut GraphBuilder, config: SynthConfig, source: S) -> MidiNodes {
    let node = MidiPitchNode::new(config, source);
    let pitch = builder.reserve();
    let gate = builder.add(node.gate_node(pitch));
    builder.fill(pitch, node);
    MidiNodes { pitch, gate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::midi::{midi_queue, MidiEvent};

    #[test]
    fn note_on_then_off_drives_the_gate() {
        let config = SynthConfig::default();
        let (mut tx, rx) = midi_queue();
        let mut builder = GraphBuilder::new();
        let midi = add_midi(&mut builder, config, rx);
        builder.set_output(midi.gate);
        let mut graph = builder.build().expect("valid graph");

        graph.process(0);
        assert_eq!(graph.output(), 0.0);

        tx.push(MidiEvent::NoteOn { note: 69, velocity: 100 }).expect("room");
        graph.process(1);
        assert_eq!(graph.output(), 1.0);
        assert!((config.value_to_hz(graph.value(midi.pitch)) - 440.0).abs() < 1e-9);

        tx.push(MidiEvent::NoteOff { note: 60 }).expect("room");
        graph.process(2);
        assert_eq!(graph.output(), 1.0, "note-off for another key is ignored");

        tx.push(MidiEvent::NoteOff { note: 69 }).expect("room");
        graph.process(3);
        assert_eq!(graph.output(), 0.0);
    }

    #[test]
    fn drains_every_queued_event_in_one_tick() {
        let config = SynthConfig::default();
        let (mut tx, rx) = midi_queue();
        let mut builder = GraphBuilder::new();
        let midi = add_midi(&mut builder, config, rx);
        builder.set_output(midi.pitch);
        let mut graph = builder.build().expect("valid graph");

        for note in [60, 62, 64, 57] {
            tx.push(MidiEvent::NoteOn { note, velocity: 90 }).expect("room");
        }
        graph.process(0);
        assert!((config.value_to_hz(graph.output()) - 220.0).abs() < 1e-9);
        assert_eq!(graph.value(midi.gate), 1.0);
    }

    #[test]
    fn bend_scales_the_pitch() {
        let config = SynthConfig::default();
        let (mut tx, rx) = midi_queue();
        let mut builder = GraphBuilder::new();
        let midi = add_midi(&mut builder, config, rx);
        builder.set_output(midi.pitch);
        let mut graph = builder.build().expect("valid graph");

        tx.push(MidiEvent::NoteOn { note: 57, velocity: 90 }).expect("room");
        tx.push(MidiEvent::PitchBend { lsb: 127, msb: 127 }).expect("room");
        graph.process(0);
        assert!((config.value_to_hz(graph.output()) - 880.0).abs() < 1e-9);
    }

    #[test]
    fn gate_runs_after_pitch() {
        let (_tx, rx) = midi_queue();
        let mut builder = GraphBuilder::new();
        let midi = add_midi(&mut builder, SynthConfig::default(), rx);
        builder.set_output(midi.gate);
        let graph = builder.build().expect("valid graph");
        assert_eq!(graph.order().collect::<Vec<_>>(), vec![midi.pitch, midi.gate]);
    }
}
