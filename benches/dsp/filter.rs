//! Benchmarks for the resonant low-pass.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ticksynth::{dsp::filter::ResonantLowpass, SynthConfig};

use crate::TICK_COUNTS;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let config = SynthConfig::default();

    for &ticks in TICK_COUNTS {
        // Ramp input, a stand-in for a saw
        let input: Vec<f64> = (0..ticks).map(|i| i as f64 / ticks as f64).collect();

        // Fixed cutoff: coefficients computed once
        let mut filter = ResonantLowpass::new(config);
        group.bench_with_input(BenchmarkId::new("static_cutoff", ticks), &ticks, |b, _| {
            b.iter(|| {
                let mut acc = 0.0;
                for &x in &input {
                    acc += filter.next(black_box(x), black_box(0.1), black_box(0.5));
                }
                acc
            })
        });

        // Cutoff moving every tick, as under an envelope
        let mut filter = ResonantLowpass::new(config);
        group.bench_with_input(BenchmarkId::new("swept_cutoff", ticks), &ticks, |b, _| {
            b.iter(|| {
                let mut acc = 0.0;
                for &x in &input {
                    acc += filter.next(black_box(x), black_box(x * 0.5), black_box(0.5));
                }
                acc
            })
        });
    }

    group.finish();
}
