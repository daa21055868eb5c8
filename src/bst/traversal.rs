use crate::arena::NodeId;
use crate::bst::graph::NodeGraph;

/// The order in which a `Traversal` visits the nodes of a tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Order {
    /// Left subtree, node, right subtree. Yields keys in ascending order.
    InOrder,
    /// Node, left subtree, right subtree.
    PreOrder,
    /// Left subtree, right subtree, node.
    PostOrder,
}

/// A lazy, read-only walk over the keys of a tree.
///
/// The walk keeps an explicit stack instead of recursing, so its memory use is bounded by the
/// height of the tree rather than the call stack. Calling `traverse` again on the tree starts a
/// fresh walk.
pub struct Traversal<'a, T, P> {
    graph: &'a NodeGraph<T, P>,
    order: Order,
    // the flag marks nodes whose children are already scheduled
    stack: Vec<(NodeId, bool)>,
}

impl<'a, T, P> Traversal<'a, T, P> {
    pub(crate) fn new(graph: &'a NodeGraph<T, P>, order: Order) -> Self {
        Traversal {
            graph,
            order,
            stack: graph.root().map(|root| (root, false)).into_iter().collect(),
        }
    }

    /// Returns the order of this traversal.
    pub fn order(&self) -> Order {
        self.order
    }

    fn schedule(&mut self, child: Option<NodeId>) {
        if let Some(child) = child {
            self.stack.push((child, false));
        }
    }

    /// Advances the walk and returns the handle of the next node.
    pub fn next_id(&mut self) -> Option<NodeId> {
        let graph = self.graph;
        while let Some((id, expanded)) = self.stack.pop() {
            if expanded {
                return Some(id);
            }
            let node = graph.node(id);
            match self.order {
                Order::PreOrder => {
                    self.schedule(node.right);
                    self.schedule(node.left);
                    return Some(id);
                },
                Order::InOrder => {
                    self.schedule(node.right);
                    self.stack.push((id, true));
                    self.schedule(node.left);
                },
                Order::PostOrder => {
                    self.stack.push((id, true));
                    self.schedule(node.right);
                    self.schedule(node.left);
                },
            }
        }
        None
    }
}

impl<'a, T, P> Iterator for Traversal<'a, T, P>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let graph = self.graph;
        self.next_id().map(move |id| &graph.node(id).key)
    }
}
