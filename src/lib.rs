//! A per-sample, monophonic synthesizer engine.
//!
//! Instruments are graphs of [`SignalNode`](graph::SignalNode)s updated once
//! per output sample. Controls and MIDI feed values in from other threads, and
//! a [`RenderLoop`](engine::RenderLoop) turns the graph's output into 16-bit
//! PCM for an [`AudioSink`](io::AudioSink).

pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod graph;
pub mod instruments;
pub mod io;

pub use config::SynthConfig;
pub use engine::RenderLoop;
pub use error::{ConfigError, GraphError, SinkError};
pub use graph::{Graph, GraphBuilder, NodeId, SignalNode};
