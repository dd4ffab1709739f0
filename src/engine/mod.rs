//! The per-sample render loop.
//!
//! One tick: update the graph, read its output, turn it into a 16-bit sample,
//! append it to the current batch, and hand the batch to the sink when full.
//!
//! ```text
//!   graph.process(tick) ─► output ∈ [0, 1] ─► i16 ─► fade-in ─► batch ─► sink
//! ```
//!
//! The loop never sleeps on its own. A device sink blocks in `write` while
//! its queue is full, and that is what keeps the loop at the sample rate.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tracing::{debug, info};

use crate::{config::SynthConfig, error::SinkError, graph::Graph, io::sink::AudioSink};

/// Map a unipolar sample onto signed 16-bit PCM.
///
/// 0.0 is full negative, 0.5 silence, 1.0 full positive. Out-of-range and NaN
/// input is clamped first; the top end saturates at `i16::MAX`.
#[inline]
pub fn quantize(value: f64) -> i16 {
    let value = if value.is_nan() { 0.5 } else { value.clamp(0.0, 1.0) };
    centered(value)
}

#[inline]
fn centered(value: f64) -> i16 {
    ((value - 0.5) * 65_536.0).clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

pub struct RenderLoop<S: AudioSink> {
    graph: Graph,
    sink: S,
    config: SynthConfig,
    tick: u64,
    batch: Vec<u8>,
    fade_ticks: u64,
    stop: Arc<AtomicBool>,
}

impl<S: AudioSink> RenderLoop<S> {
    pub fn new(graph: Graph, sink: S, config: SynthConfig) -> Self {
        let batch_samples = config.batch_samples.max(1);
        Self {
            graph,
            sink,
            config,
            tick: 0,
            batch: Vec::with_capacity(batch_samples * 2),
            fade_ticks: config.seconds_to_ticks(config.soft_start_secs),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that ends [`run`](Self::run) at the next tick once set.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Ticks rendered so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Render one sample and return it.
    pub fn step(&mut self) -> Result<i16, SinkError> {
        self.graph.process(self.tick);
        let value = self.graph.output();
        let value = if value.is_nan() { 0.5 } else { value.clamp(0.0, 1.0) };

        let sample = if self.tick < self.fade_ticks {
            let gain = self.tick as f64 / self.fade_ticks as f64;
            centered(0.5 + (value - 0.5) * gain)
        } else {
            centered(value)
        };

        self.batch.extend_from_slice(&sample.to_le_bytes());
        if self.batch.len() >= self.config.batch_samples.max(1) * 2 {
            self.flush()?;
        }
        self.tick += 1;
        Ok(sample)
    }

    /// Render exactly `ticks` samples. Whatever is left in the batch stays
    /// there until the next flush.
    pub fn run_for(&mut self, ticks: u64) -> Result<(), SinkError> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(())
    }

    /// Render until the stop flag is set, then flush, drain and close the sink.
    pub fn run(&mut self) -> Result<(), SinkError> {
        info!(
            sample_rate = self.config.sample_rate,
            batch = self.config.batch_samples,
            nodes = self.graph.len(),
            "render loop started"
        );
        while !self.stop.load(Ordering::Relaxed) {
            self.step()?;
        }
        self.finish()?;
        info!(ticks = self.tick, "render loop stopped");
        Ok(())
    }

    /// Write out the partial batch.
    pub fn flush(&mut self) -> Result<(), SinkError> {
        if !self.batch.is_empty() {
            self.sink.write(&self.batch)?;
            self.batch.clear();
        }
        Ok(())
    }

    /// Flush, drain and close the sink.
    pub fn finish(&mut self) -> Result<(), SinkError> {
        self.flush()?;
        self.sink.drain()?;
        self.sink.close()?;
        debug!(ticks = self.tick, "sink closed");
        Ok(())
    }

    pub fn into_parts(self) -> (Graph, S) {
        (self.graph, self.sink)
    }
}
