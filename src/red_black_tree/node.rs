use crate::arena::NodeId;
use crate::bst::{NodeGraph, NodeRef};

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

/// Returns the color of `node`. An absent child stands for the black sentinel leaf.
pub(crate) fn color<T>(graph: &NodeGraph<T, Color>, node: Option<NodeId>) -> Color {
    match node {
        None => Color::Black,
        Some(id) => *graph.payload(id),
    }
}

pub(crate) fn is_red<T>(graph: &NodeGraph<T, Color>, node: Option<NodeId>) -> bool {
    color(graph, node) == Color::Red
}

pub(crate) fn is_black<T>(graph: &NodeGraph<T, Color>, node: Option<NodeId>) -> bool {
    color(graph, node) == Color::Black
}

pub(crate) fn set_color<T>(graph: &mut NodeGraph<T, Color>, id: NodeId, color: Color) {
    *graph.payload_mut(id) = color;
}

impl<'a, T> NodeRef<'a, T, Color> {
    pub fn color(&self) -> Color {
        *self.payload()
    }

    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }
}
