use crate::arena::NodeId;
use crate::bst::{NodeGraph, NodeRef};
use std::cmp;

/// Height of an AVL node: zero for a leaf, and -1 for an absent child.
pub type Height = i32;

pub(crate) fn height<T>(graph: &NodeGraph<T, Height>, node: Option<NodeId>) -> Height {
    match node {
        None => -1,
        Some(id) => *graph.payload(id),
    }
}

pub(crate) fn update_height<T>(graph: &mut NodeGraph<T, Height>, id: NodeId) {
    let new_height = cmp::max(height(graph, graph.left(id)), height(graph, graph.right(id))) + 1;
    *graph.payload_mut(id) = new_height;
}

pub(crate) fn balance<T>(graph: &NodeGraph<T, Height>, id: NodeId) -> i32 {
    height(graph, graph.right(id)) - height(graph, graph.left(id))
}

impl<'a, T> NodeRef<'a, T, Height> {
    /// Returns the height of the subtree rooted at this node.
    pub fn height(&self) -> Height {
        *self.payload()
    }

    /// Returns the height of the right subtree minus the height of the left subtree.
    pub fn balance_factor(&self) -> i32 {
        let child_height = |child: Option<NodeRef<'a, T, Height>>| child.map_or(-1, |node| node.height());
        child_height(self.right()) - child_height(self.left())
    }
}
