use rtrb::{Consumer, Producer, RingBuffer};

use crate::dsp::math::hybridpow;

/// Channel voice messages the synth reacts to. The channel is dropped: the
/// instrument listens on all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    /// Raw 14-bit bend as it came off the wire, two 7-bit halves.
    PitchBend { lsb: u8, msb: u8 },
}

impl MidiEvent {
    /// Parse one raw MIDI message. Note-on with velocity 0 is a note-off;
    /// anything that is not a note or a bend yields `None`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        match (status & 0xF0, data) {
            (0x90, &[note, velocity, ..]) if velocity > 0 => Some(Self::NoteOn {
                note: note & 0x7F,
                velocity: velocity & 0x7F,
            }),
            (0x90, &[note, _, ..]) | (0x80, &[note, _, ..]) => Some(Self::NoteOff { note: note & 0x7F }),
            (0xE0, &[lsb, msb, ..]) => Some(Self::PitchBend {
                lsb: lsb & 0x7F,
                msb: msb & 0x7F,
            }),
            _ => None,
        }
    }
}

/// Non-blocking source of MIDI events, polled from the render thread.
pub trait MidiSource: Send {
    fn poll(&mut self) -> Option<MidiEvent>;
}

impl MidiSource for Consumer<MidiEvent> {
    fn poll(&mut self) -> Option<MidiEvent> {
        Consumer::pop(self).ok()
    }
}

pub const MIDI_QUEUE_SIZE: usize = 256;

/// Lock-free single-producer queue from a MIDI callback to the render thread.
pub fn midi_queue() -> (Producer<MidiEvent>, Consumer<MidiEvent>) {
    RingBuffer::<MidiEvent>::new(MIDI_QUEUE_SIZE)
}

/// Bend range in semitones at full deflection.
pub const BEND_RANGE_SEMITONES: f64 = 24.0;
const BEND_CENTER: i32 = 8192;
const BEND_SPAN: f64 = 8191.0;

/// Monophonic, last-note-priority keyboard state.
#[derive(Debug, Clone, PartialEq)]
pub struct MidiState {
    note: u8,
    velocity: u8,
    bend: f64,
    bend_semitones: f64,
    invert_bend_msb: bool,
}

impl MidiState {
    pub fn new(invert_bend_msb: bool) -> Self {
        Self {
            note: 69,
            velocity: 0,
            bend: 1.0,
            bend_semitones: 0.0,
            invert_bend_msb,
        }
    }

    pub fn apply(&mut self, event: MidiEvent) {
        match event {
            MidiEvent::NoteOn { note, velocity } => {
                self.note = note;
                self.velocity = velocity;
            }
            MidiEvent::NoteOff { note } => {
                if note == self.note {
                    self.velocity = 0;
                }
            }
            MidiEvent::PitchBend { lsb, msb } => {
                let msb = if self.invert_bend_msb { msb ^ 0x40 } else { msb };
                let raw = (i32::from(lsb) + 128 * i32::from(msb) - BEND_CENTER).max(-(BEND_SPAN as i32));
                let normalized = f64::from(raw) / BEND_SPAN;
                self.bend_semitones = normalized * BEND_RANGE_SEMITONES;
                self.bend = hybridpow(2.0, normalized * 2.0);
            }
        }
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn gate(&self) -> bool {
        self.velocity > 0
    }

    /// Pitch multiplier from the wheel (1.0 centered).
    pub fn bend(&self) -> f64 {
        self.bend
    }

    pub fn bend_semitones(&self) -> f64 {
        self.bend_semitones
    }

    /// Equal-tempered frequency of the held note, bend applied.
    pub fn frequency_hz(&self) -> f64 {
        440.0 * 2f64.powf((f64::from(self.note) - 69.0) / 12.0) * self.bend
    }
}
