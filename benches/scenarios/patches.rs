//! Benchmarks for complete patches with a key held down.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ticksynth::{
    instruments::{organ, phase_mod, subtractive},
    io::{
        midi::{midi_queue, MidiEvent},
        AudioSink,
    },
    Graph, RenderLoop, SinkError, SynthConfig,
};

use crate::TICK_COUNTS;

/// Throws the PCM away so long runs do not grow memory.
struct Discard;

impl AudioSink for Discard {
    fn write(&mut self, pcm: &[u8]) -> Result<(), SinkError> {
        black_box(pcm);
        Ok(())
    }
}

fn held(build: impl FnOnce(SynthConfig, rtrb::Consumer<MidiEvent>) -> Graph) -> RenderLoop<Discard> {
    let config = SynthConfig {
        soft_start_secs: 0.0,
        ..SynthConfig::default()
    };
    let (mut keys, events) = midi_queue();
    let graph = build(config, events);
    keys.push(MidiEvent::NoteOn { note: 57, velocity: 100 })
        .expect("fresh queue has room");
    RenderLoop::new(graph, Discard, config)
}

pub fn bench_patches(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/patches");

    for &ticks in TICK_COUNTS {
        // === DRAWBAR ORGAN ===
        // nine table sines plus one envelope
        let mut render = held(|config, events| organ(config, events).expect("organ builds").graph);
        group.bench_with_input(BenchmarkId::new("organ", ticks), &ticks, |b, &ticks| {
            b.iter(|| render.run_for(black_box(ticks)))
        });

        // === SUBTRACTIVE ===
        // two BLITs, mixer, swept low-pass, two envelopes
        let mut render = held(|config, events| subtractive(config, events).expect("subtractive builds").graph);
        group.bench_with_input(BenchmarkId::new("subtractive", ticks), &ticks, |b, &ticks| {
            b.iter(|| render.run_for(black_box(ticks)))
        });

        // === PHASE MODULATION ===
        // three operators, four envelopes
        let mut render = held(|config, events| phase_mod(config, events).expect("phase_mod builds").graph);
        group.bench_with_input(BenchmarkId::new("phase_mod", ticks), &ticks, |b, &ticks| {
            b.iter(|| render.run_for(black_box(ticks)))
        });
    }

    group.finish();
}
