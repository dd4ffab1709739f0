//! Benchmarks for ADSR envelope generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ticksynth::{
    dsp::envelope::{AdsrParams, Envelope},
    SynthConfig,
};

use crate::TICK_COUNTS;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let config = SynthConfig::default();

    for &ticks in TICK_COUNTS {
        // Attack phase (ramping up)
        let params = AdsrParams::new(10.0, 0.1, 0.7, 0.3);
        let mut env = Envelope::new(config);
        env.next(params, 1.0);
        group.bench_with_input(BenchmarkId::new("attack", ticks), &ticks, |b, &ticks| {
            b.iter(|| {
                let mut acc = 0.0;
                for _ in 0..ticks {
                    acc += env.next(black_box(params), black_box(1.0));
                }
                acc
            })
        });

        // Sustain phase (holding steady)
        let params = AdsrParams::new(0.0, 0.0, 0.7, 0.3);
        let mut env = Envelope::new(config);
        for _ in 0..4 {
            env.next(params, 1.0);
        }
        group.bench_with_input(BenchmarkId::new("sustain", ticks), &ticks, |b, &ticks| {
            b.iter(|| {
                let mut acc = 0.0;
                for _ in 0..ticks {
                    acc += env.next(black_box(params), black_box(1.0));
                }
                acc
            })
        });

        // Parameters changing every tick, the worst case for rate recompute
        let mut env = Envelope::new(config);
        group.bench_with_input(BenchmarkId::new("moving_params", ticks), &ticks, |b, &ticks| {
            b.iter(|| {
                let mut acc = 0.0;
                for i in 0..ticks {
                    let attack = 0.5 + (i % 7) as f64 * 0.01;
                    acc += env.next(black_box(AdsrParams::new(attack, 0.2, 0.5, 0.3)), 1.0);
                }
                acc
            })
        });
    }

    group.finish();
}
