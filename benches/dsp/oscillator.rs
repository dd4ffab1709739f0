//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ticksynth::{
    dsp::{
        blit::{BlitPulse, BlitSaw},
        math::{fast_sin, sin_cycles},
        oscillator::Phasor,
    },
    SynthConfig,
};

use crate::TICK_COUNTS;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let config = SynthConfig::default();

    for &ticks in TICK_COUNTS {
        // Table sine - one lookup per tick
        let mut phasor = Phasor::new(config);
        group.bench_with_input(BenchmarkId::new("table_sine", ticks), &ticks, |b, &ticks| {
            b.iter(|| {
                let mut acc = 0.0;
                for _ in 0..ticks {
                    acc += sin_cycles(phasor.advance(black_box(440.0)));
                }
                acc
            })
        });

        // Radian entry point, for comparison with f64::sin
        group.bench_with_input(BenchmarkId::new("fast_sin", ticks), &ticks, |b, &ticks| {
            b.iter(|| (0..ticks).map(|i| fast_sin(black_box(i as f64 * 0.01))).sum::<f64>())
        });
        group.bench_with_input(BenchmarkId::new("std_sin", ticks), &ticks, |b, &ticks| {
            b.iter(|| (0..ticks).map(|i| (black_box(i as f64 * 0.01)).sin()).sum::<f64>())
        });

        // BLIT saw - two table reads and a division per tick
        let mut saw = BlitSaw::new(config);
        group.bench_with_input(BenchmarkId::new("blit_saw", ticks), &ticks, |b, &ticks| {
            b.iter(|| {
                let mut acc = 0.0;
                for _ in 0..ticks {
                    acc += saw.next(black_box(110.0));
                }
                acc
            })
        });

        // BLIT pulse - two impulse trains per tick
        let mut pulse = BlitPulse::new(config);
        group.bench_with_input(BenchmarkId::new("blit_pulse", ticks), &ticks, |b, &ticks| {
            b.iter(|| {
                let mut acc = 0.0;
                for _ in 0..ticks {
                    acc += pulse.next(black_box(110.0), black_box(0.5));
                }
                acc
            })
        });
    }

    group.finish();
}
