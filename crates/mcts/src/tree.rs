//! Arena-allocated search tree.
//!
//! Using a Vec<Node> with indices provides better cache locality
//! and simpler ownership compared to Rc<RefCell<Node>>.

use crate::node::{Node, NodeId};
use std::hash::Hash;

/// Arena-allocated search tree keyed by move sequences.
///
/// Nodes are stored in a contiguous vector and referenced by index. A node
/// is addressed by the path of moves leading to it from the root. The tree
/// only grows: the root is created once and nodes are never removed.
#[derive(Debug)]
pub struct Tree<M: Clone + Eq + Hash> {
    nodes: Vec<Node<M>>,
}

impl<M: Clone + Eq + Hash> Tree<M> {
    /// Create a new tree with an empty root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::root()],
        }
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to this tree.
    pub fn get(&self, id: NodeId) -> &Node<M> {
        &self.nodes[id.0]
    }

    /// Get the root node.
    pub fn root(&self) -> &Node<M> {
        self.get(NodeId::ROOT)
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (never true, the root always exists).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child of `parent` reached by `mv`, if it has been created.
    pub fn find_child(&self, parent: NodeId, mv: &M) -> Option<NodeId> {
        self.get(parent)
            .children()
            .iter()
            .find(|(m, _)| m == mv)
            .map(|(_, id)| *id)
    }

    /// Return the child of `parent` for `mv`, creating and linking an
    /// unvisited one if it does not exist yet.
    pub fn get_or_create_child(&mut self, parent: NodeId, mv: M) -> NodeId {
        if let Some(id) = self.find_child(parent, &mv) {
            return id;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(Some(mv.clone())));
        self.nodes[parent.0].push_child(mv, id);
        id
    }

    /// Record one evaluation at `id`: bumps the visit count and folds the
    /// value into the running mean.
    pub fn record_outcome(&mut self, id: NodeId, value: f64) {
        self.nodes[id.0].stats_mut().record(value);
    }

    /// Follow `moves` from the root. Returns None as soon as a move has no
    /// child node.
    pub fn node_at(&self, moves: &[M]) -> Option<NodeId> {
        moves
            .iter()
            .try_fold(NodeId::ROOT, |node, mv| self.find_child(node, mv))
    }

    /// Iterate over every node with its ID, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<M>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}

impl<M: Clone + Eq + Hash> Default for Tree<M> {
    fn default() -> Self {
        Self::new()
    }
}
