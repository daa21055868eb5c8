use crate::arena::{NodeArena, NodeId};
use crate::bst::node::{Node, NodeRef};
use crate::bst::traversal::{Order, Traversal};
use crate::error::{Result, TreeError};
use log::{debug, trace};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::Debug;

/// Number of nodes allocated at a time when a tree is built with `new()`.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// The outcome of structurally unlinking a node from a `NodeGraph`.
pub struct Unlinked {
    /// Node now occupying the position of the removed node, if any.
    pub replacement: Option<NodeId>,
    /// Lowest node whose subtree changed shape. This is the replacement when there is one and the
    /// former parent of the removed node otherwise.
    pub resume: Option<NodeId>,
}

/// The node graph shared by every tree: an arena of nodes linked through parent, left and right
/// handles, plus the root handle.
///
/// The graph knows nothing about balancing. It performs the unbalanced search tree surgery and
/// offers rotations, and each balancer drives it while maintaining its own payload `P`.
pub struct NodeGraph<T, P> {
    arena: NodeArena<Node<T, P>>,
    root: Option<NodeId>,
}

impl<T, P> NodeGraph<T, P> {
    pub fn new(chunk_size: usize) -> Self {
        NodeGraph {
            arena: NodeArena::new(chunk_size),
            root: None,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// # Panics
    ///
    /// Panics if `id` does not refer to a live node.
    pub fn node(&self, id: NodeId) -> &Node<T, P> {
        &self.arena[id]
    }

    #[cfg(test)]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<T, P> {
        &mut self.arena[id]
    }

    /// Returns a view of the node behind `id`, or `None` if it has been released.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, T, P>> {
        self.arena.get(id).map(|_| NodeRef::new(self, id))
    }

    pub fn key(&self, id: NodeId) -> &T {
        &self.arena[id].key
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].left
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].right
    }

    pub fn payload(&self, id: NodeId) -> &P {
        &self.arena[id].payload
    }

    pub fn payload_mut(&mut self, id: NodeId) -> &mut P {
        &mut self.arena[id].payload
    }

    /// Makes `child` the left child of `parent` and points `child` back at `parent`.
    pub fn set_left(&mut self, parent: NodeId, child: Option<NodeId>) {
        self.arena[parent].left = child;
        if let Some(child) = child {
            self.arena[child].parent = Some(parent);
        }
    }

    /// Makes `child` the right child of `parent` and points `child` back at `parent`.
    pub fn set_right(&mut self, parent: NodeId, child: Option<NodeId>) {
        self.arena[parent].right = child;
        if let Some(child) = child {
            self.arena[child].parent = Some(parent);
        }
    }

    // Points the slot of `parent` that holds `old` (or the root slot) at `new`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = &mut self.arena[parent];
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            },
        }
    }

    /// Replaces the subtree rooted at `old` with the subtree rooted at `new` in the slot that held
    /// `old`. The links of `old` itself are left untouched.
    pub fn transplant(&mut self, old: NodeId, new: Option<NodeId>) {
        let parent = self.arena[old].parent;
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.arena[new].parent = parent;
        }
    }

    /// Promotes the right child of `id` into its position and returns the promoted node.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no right child.
    pub fn rotate_left(&mut self, id: NodeId) -> NodeId {
        let pivot = self.arena[id]
            .right
            .expect("Expected right child node to be `Some`.");
        trace!("rotate left: {:?} promotes {:?}", id, pivot);
        let parent = self.arena[id].parent;
        let inner = self.arena[pivot].left;
        self.set_right(id, inner);
        self.replace_child(parent, id, Some(pivot));
        self.arena[pivot].parent = parent;
        self.set_left(pivot, Some(id));
        pivot
    }

    /// Promotes the left child of `id` into its position and returns the promoted node.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no left child.
    pub fn rotate_right(&mut self, id: NodeId) -> NodeId {
        let pivot = self.arena[id]
            .left
            .expect("Expected left child node to be `Some`.");
        trace!("rotate right: {:?} promotes {:?}", id, pivot);
        let parent = self.arena[id].parent;
        let inner = self.arena[pivot].right;
        self.set_left(id, inner);
        self.replace_child(parent, id, Some(pivot));
        self.arena[pivot].parent = parent;
        self.set_right(pivot, Some(id));
        pivot
    }

    /// Returns the leftmost node of the subtree rooted at `id`.
    pub fn minimum(&self, id: NodeId) -> NodeId {
        let mut curr = id;
        while let Some(left) = self.arena[curr].left {
            curr = left;
        }
        curr
    }

    /// Returns the rightmost node of the subtree rooted at `id`.
    pub fn maximum(&self, id: NodeId) -> NodeId {
        let mut curr = id;
        while let Some(right) = self.arena[curr].right {
            curr = right;
        }
        curr
    }

    /// Returns the node that follows `id` in an in-order traversal.
    pub fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.arena[id].right {
            return Some(self.minimum(right));
        }
        // lowest ancestor reached from its left subtree
        let mut curr = id;
        let mut parent = self.arena[id].parent;
        while let Some(ancestor) = parent {
            if self.arena[ancestor].right != Some(curr) {
                break;
            }
            curr = ancestor;
            parent = self.arena[ancestor].parent;
        }
        parent
    }

    /// Returns the node that precedes `id` in an in-order traversal.
    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(left) = self.arena[id].left {
            return Some(self.maximum(left));
        }
        let mut curr = id;
        let mut parent = self.arena[id].parent;
        while let Some(ancestor) = parent {
            if self.arena[ancestor].left != Some(curr) {
                break;
            }
            curr = ancestor;
            parent = self.arena[ancestor].parent;
        }
        parent
    }

    /// Frees a node that has already been unlinked from the graph.
    pub fn release(&mut self, id: NodeId) -> Node<T, P> {
        self.arena.release(id)
    }

    /// Removes `id` from the graph without any rebalancing and frees it.
    ///
    /// A leaf is simply cut from its parent. A node with one child is replaced by that child. A
    /// node with two children is replaced by the minimum of its right subtree, which first hands
    /// its own right subtree to its former parent when it is not the direct right child.
    pub fn unlink(&mut self, id: NodeId) -> Unlinked {
        let (parent, left, right) = {
            let node = &self.arena[id];
            (node.parent, node.left, node.right)
        };

        let replacement = match (left, right) {
            (None, None) => {
                self.replace_child(parent, id, None);
                None
            },
            (None, Some(child)) | (Some(child), None) => {
                self.transplant(id, Some(child));
                Some(child)
            },
            (Some(left), Some(right)) => {
                let successor = self.minimum(right);
                if successor != right {
                    let successor_right = self.arena[successor].right;
                    self.transplant(successor, successor_right);
                    self.set_right(successor, Some(right));
                }
                self.transplant(id, Some(successor));
                self.set_left(successor, Some(left));
                Some(successor)
            },
        };

        self.release(id);
        Unlinked {
            replacement,
            resume: replacement.or(parent),
        }
    }

    /// Returns the number of edges on the longest path from the root to a leaf, or `None` for an
    /// empty graph.
    pub fn height(&self) -> Option<usize> {
        let root = self.root?;
        let mut height = 0;
        let mut stack = vec![(root, 0)];
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.arena[id];
            for child in node.left.iter().chain(node.right.iter()) {
                stack.push((*child, depth + 1));
            }
        }
        Some(height)
    }

    pub fn traverse(&self, order: Order) -> Traversal<'_, T, P> {
        Traversal::new(self, order)
    }

    pub fn min_key(&self) -> Result<&T> {
        self.root
            .map(|root| self.key(self.minimum(root)))
            .ok_or(TreeError::EmptyTree)
    }

    pub fn max_key(&self) -> Result<&T> {
        self.root
            .map(|root| self.key(self.maximum(root)))
            .ok_or(TreeError::EmptyTree)
    }
}

impl<T, P> NodeGraph<T, P>
where
    T: Ord,
{
    /// Descends from the root and returns the first node whose key equals `key`.
    pub fn search<V>(&self, key: &V) -> Option<NodeId>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.arena[id];
            curr = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Like `search`, but reports a miss as `TreeError::NotFound`.
    pub fn find<V>(&self, key: &V) -> Result<NodeId>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.search(key).ok_or_else(|| {
            debug!("lookup missed in a tree of {} keys", self.len());
            TreeError::NotFound
        })
    }

    /// Attaches a new leaf at the first empty slot on the search path of `key` and returns it.
    /// Keys equal to an existing key descend to the right.
    pub fn insert_leaf(&mut self, key: T, payload: P) -> NodeId {
        let mut parent = None;
        let mut goes_left = false;
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.arena[id];
            parent = Some(id);
            goes_left = key < node.key;
            curr = if goes_left { node.left } else { node.right };
        }

        let id = self.arena.alloc(Node::new(key, payload, parent));
        match parent {
            None => self.root = Some(id),
            Some(parent) if goes_left => self.arena[parent].left = Some(id),
            Some(parent) => self.arena[parent].right = Some(id),
        }
        id
    }

    pub fn successor_key<V>(&self, key: &V) -> Result<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let id = self.find(key)?;
        self.successor(id)
            .map(|next| self.key(next))
            .ok_or(TreeError::NoSuccessor)
    }

    pub fn predecessor_key<V>(&self, key: &V) -> Result<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let id = self.find(key)?;
        self.predecessor(id)
            .map(|prev| self.key(prev))
            .ok_or(TreeError::NoPredecessor)
    }
}

impl<T, P> NodeGraph<T, P>
where
    T: Ord + Debug,
{
    /// Checks that parent and child links agree, that an in-order walk yields keys in
    /// non-decreasing order, and that the walk visits exactly `len()` nodes.
    pub fn check_structure(&self) -> std::result::Result<(), String> {
        let root = match self.root {
            Some(root) => root,
            None if self.len() == 0 => return Ok(()),
            None => return Err(format!("empty tree still holds {} nodes", self.len())),
        };
        if let Some(parent) = self.arena[root].parent {
            return Err(format!("root {:?} has parent {:?}", self.arena[root].key, parent));
        }

        let mut visited = 0;
        let mut previous: Option<&T> = None;
        let mut nodes = self.traverse(Order::InOrder);
        while let Some(id) = nodes.next_id() {
            visited += 1;
            if visited > self.len() {
                return Err(format!("walk visits more than {} nodes", self.len()));
            }

            let node = &self.arena[id];
            for child in node.left.iter().chain(node.right.iter()) {
                match self.arena.get(*child) {
                    None => {
                        return Err(format!("{:?} links to a released node", node.key));
                    },
                    Some(child) if child.parent != Some(id) => {
                        return Err(format!(
                            "{:?} does not link back to its parent {:?}",
                            child.key, node.key,
                        ));
                    },
                    Some(_) => {},
                }
            }

            if let Some(previous) = previous {
                if *previous > node.key {
                    return Err(format!("{:?} precedes {:?}", previous, node.key));
                }
            }
            previous = Some(&node.key);
        }

        if visited != self.len() {
            return Err(format!("walk visits {} of {} nodes", visited, self.len()));
        }
        Ok(())
    }
}
