//! Per-sample signal graph.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. The graph
//! computes a producer-before-consumer order once, at build time, and then
//! updates every node exactly once per tick in that order. Any number of
//! consumers may read the same node; its value is computed once and cached.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::GraphError;

/// Multiply two signals (amplitude control).
pub mod amplify;
/// Externally driven values: knobs, constants, scalers.
pub mod control;
/// ADSR envelope node.
pub mod envelope;
/// Resonant low-pass node.
pub mod filter;
/// MIDI note/gate adapter nodes.
pub mod midi;
/// Three-input weighted mixer.
pub mod mix;
/// Core traits shared by all graph nodes.
pub mod node;
/// Sine, ramp and band-limited oscillators.
pub mod oscillator;
/// Phase-modulation operators and the three-operator combinator.
pub mod pm;
/// Pass-through tap feeding a display queue.
pub mod scope;

pub use node::{NodeId, SignalNode, Signals};

/// Collects nodes and wiring, then validates them into a [`Graph`].
#[derive(Default)]
pub struct GraphBuilder {
    slots: Vec<Option<Box<dyn SignalNode>>>,
    output: Option<NodeId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<N: SignalNode + 'static>(&mut self, node: N) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Some(Box::new(node)));
        id
    }

    /// Reserve an id now and supply the node later with [`fill`](Self::fill).
    /// Lets a node be referenced before it can be constructed.
    pub fn reserve(&mut self) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(None);
        id
    }

    pub fn fill<N: SignalNode + 'static>(&mut self, id: NodeId, node: N) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            *slot = Some(Box::new(node));
        }
    }

    pub fn set_output(&mut self, id: NodeId) {
        self.output = Some(id);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn build(self) -> Result<Graph, GraphError> {
        let output = self.output.ok_or(GraphError::MissingOutput)?;
        if output.0 >= self.slots.len() {
            return Err(GraphError::UnknownOutput(output));
        }

        let mut nodes = Vec::with_capacity(self.slots.len());
        for (index, slot) in self.slots.into_iter().enumerate() {
            nodes.push(slot.ok_or(GraphError::Unfilled(NodeId(index)))?);
        }

        let order = topological_order(&nodes)?;

        debug!(
            nodes = nodes.len(),
            output = %output,
            order = ?order.iter().map(|&i| nodes[i].name()).collect::<Vec<_>>(),
            "signal graph built"
        );

        Ok(Graph {
            values: vec![0.0; nodes.len()],
            nodes,
            order,
            output,
        })
    }
}

/// Kahn's algorithm. Among nodes that are ready at the same time the one
/// added first goes first, so the order is deterministic.
fn topological_order(nodes: &[Box<dyn SignalNode>]) -> Result<Vec<usize>, GraphError> {
    let count = nodes.len();
    let mut pending = vec![0usize; count];
    let mut consumers: Vec<Vec<usize>> = vec![Vec::new(); count];

    for (index, node) in nodes.iter().enumerate() {
        for input in node.inputs() {
            if input.0 >= count {
                return Err(GraphError::UnknownInput {
                    node: NodeId(index),
                    input,
                });
            }
            pending[index] += 1;
            consumers[input.0].push(index);
        }
    }

    let mut ready: BTreeSet<usize> = (0..count).filter(|&i| pending[i] == 0).collect();
    let mut order = Vec::with_capacity(count);

    while let Some(index) = ready.pop_first() {
        order.push(index);
        for &consumer in &consumers[index] {
            pending[consumer] -= 1;
            if pending[consumer] == 0 {
                ready.insert(consumer);
            }
        }
    }

    if order.len() < count {
        let stuck = (0..count).find(|&i| pending[i] > 0).unwrap_or(0);
        return Err(GraphError::Cycle(NodeId(stuck)));
    }

    Ok(order)
}

/// A validated, ready-to-run signal graph.
pub struct Graph {
    nodes: Vec<Box<dyn SignalNode>>,
    values: Vec<f64>,
    order: Vec<usize>,
    output: NodeId,
}

impl Graph {
    /// Update every node once for `tick`, producers before consumers.
    pub fn process(&mut self, tick: u64) {
        let Graph {
            nodes,
            values,
            order,
            ..
        } = self;

        for &index in order.iter() {
            let value = nodes[index].update(tick, &Signals::new(values));
            values[index] = value;
        }
    }

    /// Cached value of `id` from the most recent [`process`](Self::process).
    #[inline]
    pub fn value(&self, id: NodeId) -> f64 {
        self.values[id.0]
    }

    #[inline]
    pub fn output(&self) -> f64 {
        self.values[self.output.0]
    }

    pub fn output_id(&self) -> NodeId {
        self.output
    }

    /// Evaluation order.
    pub fn order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().map(|&i| NodeId(i))
    }

    pub fn name(&self, id: NodeId) -> &'static str {
        self.nodes[id.0].name()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
