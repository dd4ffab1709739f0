//! Edges of the engine: MIDI in, PCM out.

pub mod midi;
pub mod sink;

pub use midi::{MidiEvent, MidiSource, MidiState};
pub use sink::{AudioSink, CpalSink, MemorySink};
