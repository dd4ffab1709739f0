//! Benchmarks for the three-operator phase-modulation node.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ticksynth::{
    graph::{
        control::{Constant, Control},
        pm::{OperatorInputs, ThreeOperatorPm, Topology},
    },
    GraphBuilder, SynthConfig,
};

use crate::TICK_COUNTS;

pub fn bench_pm(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/pm");
    let config = SynthConfig::default();

    for topology in Topology::ALL {
        let selector = Control::new(topology.index() as f64);
        let mut builder = GraphBuilder::new();
        let freq = builder.add(Constant(config.hz_to_value(220.0)));
        let topo = builder.add(selector.node());
        let ratio = builder.add(Constant(2.0));
        let pm = builder.add(
            ThreeOperatorPm::new(config, freq)
                .with_topology(topo)
                .operator(1, OperatorInputs::new().ratio(ratio)),
        );
        builder.set_output(pm);
        let mut graph = builder.build().expect("valid graph");

        for &ticks in TICK_COUNTS {
            let name = format!("{topology:?}").to_lowercase();
            group.bench_with_input(BenchmarkId::new(name, ticks), &ticks, |b, &ticks| {
                let mut tick = 0;
                b.iter(|| {
                    for _ in 0..ticks {
                        graph.process(tick);
                        tick += 1;
                    }
                    black_box(graph.output())
                })
            });
        }
    }

    group.finish();
}
