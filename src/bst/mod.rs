//! Unbalanced binary search tree and the node graph that every tree in this crate is built on.
//!
//! Nodes live in a [`NodeArena`](crate::arena::NodeArena) and refer to their parent and children
//! through [`NodeId`](crate::arena::NodeId) handles, so rotations and transplants are plain handle
//! reassignments.

mod graph;
mod node;
mod traversal;
mod tree;

pub use self::graph::DEFAULT_CHUNK_SIZE;
pub(crate) use self::graph::NodeGraph;
pub use self::node::NodeRef;
pub use self::traversal::{Order, Traversal};
pub use self::tree::BinarySearchTree;
