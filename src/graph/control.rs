use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::graph::node::{NodeId, SignalNode, Signals};

/*
Controls
========

A control is a value that something outside the render loop decides: a knob
on a panel, a preset picker, a test poking the graph. The writer holds a
`Control` handle; the graph holds a `ControlNode` sharing the same cell and
reads it once per tick.

  UI thread                     render thread
  ---------                     -------------
  cutoff.set(0.3)   ───────►    ControlNode::update -> 0.3
                    (atomic)

The cell is an f64 stored as its bit pattern in an AtomicU64. A reader sees
either the old or the new value, never half of each. Relaxed ordering is
enough: no other memory is published alongside the value, and a change only
has to show up by the next tick that polls it.
*/

#[derive(Debug)]
struct AtomicF64(AtomicU64);

impl AtomicF64 {
    fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    #[inline]
    fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Shared handle to one externally driven value.
#[derive(Debug, Clone)]
pub struct Control {
    cell: Arc<AtomicF64>,
}

impl Control {
    pub fn new(value: f64) -> Self {
        Self {
            cell: Arc::new(AtomicF64::new(value)),
        }
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.cell.get()
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.cell.set(value);
    }

    /// Graph node that reads this control every tick.
    pub fn node(&self) -> ControlNode {
        ControlNode {
            control: self.clone(),
        }
    }
}

pub struct ControlNode {
    control: Control,
}

impl SignalNode for ControlNode {
    fn update(&mut self, _tick: u64, _signals: &Signals<'_>) -> f64 {
        self.control.get()
    }

    fn inputs(&self) -> Vec<NodeId> {
        Vec::new()
    }

    fn name(&self) -> &'static str {
        "control"
    }
}

pub struct Constant(pub f64);

impl SignalNode for Constant {
    fn update(&mut self, _tick: u64, _signals: &Signals<'_>) -> f64 {
        self.0
    }

    fn inputs(&self) -> Vec<NodeId> {
        Vec::new()
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

/// `multiplier * (input + offset)`.
///
/// Turns an option index into a musical value, e.g. `Scaler::new(i, 0.25, 1.0)`
/// maps indices 0, 1, 2 to 0.25, 0.5, 0.75.
pub struct Scaler {
    input: NodeId,
    multiplier: f64,
    offset: f64,
}

impl Scaler {
    pub fn new(input: NodeId, multiplier: f64, offset: f64) -> Self {
        Self {
            input,
            multiplier,
            offset,
        }
    }
}

impl SignalNode for Scaler {
    fn update(&mut self, _tick: u64, signals: &Signals<'_>) -> f64 {
        self.multiplier * (signals.get(self.input) + self.offset)
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.input]
    }

    fn name(&self) -> &'static str {
        "scaler"
    }
}
