use std::fmt;

/// Index of a node inside a [`Graph`](super::Graph). Stable for the graph's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only view of every node's cached value for the tick being computed.
///
/// Upstream nodes have already been updated when a node reads them, so a
/// `get` always returns this tick's value.
#[derive(Clone, Copy)]
pub struct Signals<'a> {
    values: &'a [f64],
}

impl<'a> Signals<'a> {
    pub(crate) fn new(values: &'a [f64]) -> Self {
        Self { values }
    }

    #[inline(always)]
    pub fn get(&self, id: NodeId) -> f64 {
        self.values[id.0]
    }

    /// Value of an optional input, `default` when it is not wired.
    #[inline(always)]
    pub fn get_or(&self, id: Option<NodeId>, default: f64) -> f64 {
        match id {
            Some(id) => self.values[id.0],
            None => default,
        }
    }
}

/// Core trait for per-sample signal nodes
///
/// A node produces exactly one value per tick. The graph calls `update` once
/// per tick, after every node listed in `inputs`, and caches the result.
pub trait SignalNode: Send {
    fn update(&mut self, tick: u64, signals: &Signals<'_>) -> f64;

    /// Upstream nodes read during `update`. Used to order evaluation.
    fn inputs(&self) -> Vec<NodeId>;

    fn name(&self) -> &'static str {
        "node"
    }
}

/// Allow boxed nodes to be used as nodes (for dynamic dispatch)
impl SignalNode for Box<dyn SignalNode> {
    fn update(&mut self, tick: u64, signals: &Signals<'_>) -> f64 {
        (**self).update(tick, signals)
    }

    fn inputs(&self) -> Vec<NodeId> {
        (**self).inputs()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Collect the wired ids out of a list of optional inputs.
pub(crate) fn wired<const N: usize>(inputs: [Option<NodeId>; N]) -> Vec<NodeId> {
    inputs.into_iter().flatten().collect()
}
