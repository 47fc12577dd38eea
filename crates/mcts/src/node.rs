//! Search tree node types.
//!
//! Uses arena allocation with indices for cache locality and simpler memory management.

use montecarlo_core::{MctsError, Result};
use std::hash::Hash;

/// Index into the node arena.
///
/// This is a lightweight handle that references a node in the tree.
/// Using indices instead of pointers avoids Rc/RefCell overhead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Outcome statistics for a single node.
///
/// The average is kept as a running mean rather than a stored sum, and is
/// unset until the first outcome is recorded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeStats {
    visit_count: u32,
    average_value: Option<f64>,
}

impl NodeStats {
    /// Stats of a node no simulation has passed through yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed backpropagations through this node.
    pub fn visit_count(&self) -> u32 {
        self.visit_count
    }

    /// Whether at least one outcome has been recorded.
    pub fn is_visited(&self) -> bool {
        self.visit_count > 0
    }

    /// Mean of every evaluation backpropagated through this node.
    ///
    /// # Errors
    /// Returns `MctsError::UnvisitedNode` if the node has never been visited.
    pub fn average_value(&self) -> Result<f64> {
        self.average_value.ok_or(MctsError::UnvisitedNode)
    }

    /// Fold one evaluation into the running mean.
    pub fn record(&mut self, value: f64) {
        self.visit_count += 1;
        self.average_value = Some(match self.average_value {
            Some(mean) => mean + (value - mean) / self.visit_count as f64,
            None => value,
        });
    }
}

/// A node in the search tree.
///
/// Each node stands for the position reached by the moves on the path from
/// the root, and stores statistics about the simulations that passed
/// through it.
#[derive(Clone, Debug)]
pub struct Node<M: Clone + Eq + Hash> {
    /// Move that led to this node (None for root).
    mv: Option<M>,

    /// Visit count and running mean.
    stats: NodeStats,

    /// Children in creation order: (move, node_id) pairs.
    /// A missing move means "not expanded yet", not "illegal".
    children: Vec<(M, NodeId)>,
}

impl<M: Clone + Eq + Hash> Node<M> {
    /// Create a new node without statistics or children.
    pub fn new(mv: Option<M>) -> Self {
        Self {
            mv,
            stats: NodeStats::new(),
            children: Vec::new(),
        }
    }

    /// Create the root node.
    pub fn root() -> Self {
        Self::new(None)
    }

    /// Move that led to this node (None for root).
    pub fn mv(&self) -> Option<&M> {
        self.mv.as_ref()
    }

    /// Statistics recorded at this node.
    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    /// Children in creation order.
    pub fn children(&self) -> &[(M, NodeId)] {
        &self.children
    }

    /// Whether any child has been created.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub(crate) fn stats_mut(&mut self) -> &mut NodeStats {
        &mut self.stats
    }

    pub(crate) fn push_child(&mut self, mv: M, id: NodeId) {
        self.children.push((mv, id));
    }
}
