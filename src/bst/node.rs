use crate::arena::NodeId;
use crate::bst::graph::NodeGraph;

/// A node of a binary search tree together with the payload its balancer keeps.
pub struct Node<T, P> {
    pub key: T,
    pub payload: P,
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl<T, P> Node<T, P> {
    pub fn new(key: T, payload: P, parent: Option<NodeId>) -> Self {
        Node {
            key,
            payload,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// A read-only view of a node inside a tree.
///
/// A `NodeRef` borrows the whole tree, so the tree cannot be mutated while the view is alive.
pub struct NodeRef<'a, T, P> {
    graph: &'a NodeGraph<T, P>,
    id: NodeId,
}

impl<'a, T, P> NodeRef<'a, T, P> {
    pub(crate) fn new(graph: &'a NodeGraph<T, P>, id: NodeId) -> Self {
        NodeRef { graph, id }
    }

    fn node(&self) -> &'a Node<T, P> {
        self.graph.node(self.id)
    }

    fn view(&self, id: Option<NodeId>) -> Option<NodeRef<'a, T, P>> {
        id.map(|id| NodeRef::new(self.graph, id))
    }

    /// Returns the handle of the node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn key(&self) -> &'a T {
        &self.node().key
    }

    pub fn parent(&self) -> Option<NodeRef<'a, T, P>> {
        self.view(self.node().parent)
    }

    pub fn left(&self) -> Option<NodeRef<'a, T, P>> {
        self.view(self.node().left)
    }

    pub fn right(&self) -> Option<NodeRef<'a, T, P>> {
        self.view(self.node().right)
    }

    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// Returns the balancing payload of the node.
    pub fn payload(&self) -> &'a P {
        &self.node().payload
    }
}

impl<'a, T, P> Clone for NodeRef<'a, T, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, P> Copy for NodeRef<'a, T, P> {}
