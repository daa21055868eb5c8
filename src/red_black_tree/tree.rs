use crate::arena::NodeId;
use crate::bst::{NodeGraph, NodeRef, Order, Traversal, DEFAULT_CHUNK_SIZE};
use crate::error::Result;
use crate::red_black_tree::node::{self, Color};
use log::trace;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;

/// An ordered tree of keys that keeps a color bit on every node so that no root-to-leaf path is
/// more than twice as long as any other.
///
/// The tree maintains three invariants: the root is black, a red node has no red child, and every
/// path from a node down to an absent child crosses the same number of black nodes. Absent
/// children count as black sentinel leaves.
///
/// # Examples
///
/// ```
/// use balanced_trees::red_black_tree::{Color, RedBlackTree};
///
/// let mut tree = RedBlackTree::new();
/// for key in 0..7 {
///     tree.insert(key);
/// }
///
/// assert_eq!(tree.root().map(|node| node.color()), Some(Color::Black));
/// assert_eq!(tree.min(), Ok(&0));
///
/// assert!(tree.delete(&0).is_ok());
/// assert_eq!(tree.min(), Ok(&1));
/// assert!(tree.assert_valid().is_ok());
/// ```
pub struct RedBlackTree<T> {
    graph: NodeGraph<T, Color>,
}

impl<T> RedBlackTree<T> {
    /// Constructs a new, empty `RedBlackTree<T>`.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `RedBlackTree<T>` whose node storage grows by `chunk_size` nodes
    /// at a time.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        RedBlackTree {
            graph: NodeGraph::new(chunk_size),
        }
    }

    fn is_red(&self, node: Option<NodeId>) -> bool {
        node::is_red(&self.graph, node)
    }

    fn is_black(&self, node: Option<NodeId>) -> bool {
        node::is_black(&self.graph, node)
    }

    fn paint(&mut self, id: NodeId, color: Color) {
        node::set_color(&mut self.graph, id, color);
    }

    fn insert_fixup(&mut self, mut curr: NodeId) {
        loop {
            let parent = match self.graph.parent(curr) {
                Some(parent) if self.is_red(Some(parent)) => parent,
                _ => break,
            };
            let grandparent = self
                .graph
                .parent(parent)
                .expect("Expected a red node to have a parent.");

            if self.graph.left(grandparent) == Some(parent) {
                let uncle = self.graph.right(grandparent);
                match uncle {
                    Some(uncle) if self.is_red(Some(uncle)) => {
                        trace!("rb insert: red uncle, recolor at {:?}", grandparent);
                        self.paint(parent, Color::Black);
                        self.paint(uncle, Color::Black);
                        self.paint(grandparent, Color::Red);
                        curr = grandparent;
                    },
                    _ => {
                        let mut parent = parent;
                        if self.graph.right(parent) == Some(curr) {
                            trace!("rb insert: inner grandchild {:?}", curr);
                            curr = parent;
                            self.graph.rotate_left(curr);
                            parent = self
                                .graph
                                .parent(curr)
                                .expect("Expected a rotated node to have a parent.");
                        }
                        trace!("rb insert: outer grandchild, rotate at {:?}", grandparent);
                        self.paint(parent, Color::Black);
                        self.paint(grandparent, Color::Red);
                        self.graph.rotate_right(grandparent);
                    },
                }
            } else {
                let uncle = self.graph.left(grandparent);
                match uncle {
                    Some(uncle) if self.is_red(Some(uncle)) => {
                        trace!("rb insert: red uncle, recolor at {:?}", grandparent);
                        self.paint(parent, Color::Black);
                        self.paint(uncle, Color::Black);
                        self.paint(grandparent, Color::Red);
                        curr = grandparent;
                    },
                    _ => {
                        let mut parent = parent;
                        if self.graph.left(parent) == Some(curr) {
                            trace!("rb insert: inner grandchild {:?}", curr);
                            curr = parent;
                            self.graph.rotate_right(curr);
                            parent = self
                                .graph
                                .parent(curr)
                                .expect("Expected a rotated node to have a parent.");
                        }
                        trace!("rb insert: outer grandchild, rotate at {:?}", grandparent);
                        self.paint(parent, Color::Black);
                        self.paint(grandparent, Color::Red);
                        self.graph.rotate_left(grandparent);
                    },
                }
            }
        }

        if let Some(root) = self.graph.root() {
            self.paint(root, Color::Black);
        }
    }

    // `curr` carries an extra black. It may be an absent child, so its parent is tracked
    // alongside it.
    fn delete_fixup(&mut self, mut curr: Option<NodeId>, mut parent: Option<NodeId>) {
        while curr != self.graph.root() && self.is_black(curr) {
            let curr_parent = parent.expect("Expected a non-root node to have a parent.");

            if self.graph.left(curr_parent) == curr {
                let mut sibling = self
                    .graph
                    .right(curr_parent)
                    .expect("Expected a doubly black node to have a sibling.");
                if self.is_red(Some(sibling)) {
                    trace!("rb delete: red sibling {:?}", sibling);
                    self.paint(sibling, Color::Black);
                    self.paint(curr_parent, Color::Red);
                    self.graph.rotate_left(curr_parent);
                    sibling = self
                        .graph
                        .right(curr_parent)
                        .expect("Expected a doubly black node to have a sibling.");
                }

                if self.is_black(self.graph.left(sibling)) && self.is_black(self.graph.right(sibling)) {
                    trace!("rb delete: black nephews, move up from {:?}", curr_parent);
                    self.paint(sibling, Color::Red);
                    curr = Some(curr_parent);
                    parent = self.graph.parent(curr_parent);
                } else {
                    if self.is_black(self.graph.right(sibling)) {
                        trace!("rb delete: red near nephew under {:?}", sibling);
                        let near = self
                            .graph
                            .left(sibling)
                            .expect("Expected a red nephew to be `Some`.");
                        self.paint(near, Color::Black);
                        self.paint(sibling, Color::Red);
                        self.graph.rotate_right(sibling);
                        sibling = self
                            .graph
                            .right(curr_parent)
                            .expect("Expected a doubly black node to have a sibling.");
                    }
                    trace!("rb delete: red far nephew under {:?}", sibling);
                    let far = self
                        .graph
                        .right(sibling)
                        .expect("Expected a red nephew to be `Some`.");
                    let parent_color = node::color(&self.graph, Some(curr_parent));
                    self.paint(sibling, parent_color);
                    self.paint(curr_parent, Color::Black);
                    self.paint(far, Color::Black);
                    self.graph.rotate_left(curr_parent);
                    curr = self.graph.root();
                    parent = None;
                }
            } else {
                let mut sibling = self
                    .graph
                    .left(curr_parent)
                    .expect("Expected a doubly black node to have a sibling.");
                if self.is_red(Some(sibling)) {
                    trace!("rb delete: red sibling {:?}", sibling);
                    self.paint(sibling, Color::Black);
                    self.paint(curr_parent, Color::Red);
                    self.graph.rotate_right(curr_parent);
                    sibling = self
                        .graph
                        .left(curr_parent)
                        .expect("Expected a doubly black node to have a sibling.");
                }

                if self.is_black(self.graph.left(sibling)) && self.is_black(self.graph.right(sibling)) {
                    trace!("rb delete: black nephews, move up from {:?}", curr_parent);
                    self.paint(sibling, Color::Red);
                    curr = Some(curr_parent);
                    parent = self.graph.parent(curr_parent);
                } else {
                    if self.is_black(self.graph.left(sibling)) {
                        trace!("rb delete: red near nephew under {:?}", sibling);
                        let near = self
                            .graph
                            .right(sibling)
                            .expect("Expected a red nephew to be `Some`.");
                        self.paint(near, Color::Black);
                        self.paint(sibling, Color::Red);
                        self.graph.rotate_left(sibling);
                        sibling = self
                            .graph
                            .left(curr_parent)
                            .expect("Expected a doubly black node to have a sibling.");
                    }
                    trace!("rb delete: red far nephew under {:?}", sibling);
                    let far = self
                        .graph
                        .left(sibling)
                        .expect("Expected a red nephew to be `Some`.");
                    let parent_color = node::color(&self.graph, Some(curr_parent));
                    self.paint(sibling, parent_color);
                    self.paint(curr_parent, Color::Black);
                    self.paint(far, Color::Black);
                    self.graph.rotate_right(curr_parent);
                    curr = self.graph.root();
                    parent = None;
                }
            }
        }

        if let Some(curr) = curr {
            self.paint(curr, Color::Black);
        }
    }

    // Structural removal that tracks the color leaving its position and the absent-or-present
    // node that inherits the missing black.
    fn remove_node(&mut self, id: NodeId) -> Option<NodeId> {
        let (parent, left, right) = {
            let node = self.graph.node(id);
            (node.parent, node.left, node.right)
        };
        let mut removed_color = node::color(&self.graph, Some(id));

        let (replacement, fixup_node, fixup_parent) = match (left, right) {
            (None, child) | (child, None) => {
                self.graph.transplant(id, child);
                (child, child, parent)
            },
            (Some(left), Some(right)) => {
                let successor = self.graph.minimum(right);
                removed_color = node::color(&self.graph, Some(successor));
                let successor_right = self.graph.right(successor);
                let fixup_parent = if successor == right {
                    Some(successor)
                } else {
                    let successor_parent = self.graph.parent(successor);
                    self.graph.transplant(successor, successor_right);
                    self.graph.set_right(successor, Some(right));
                    successor_parent
                };
                self.graph.transplant(id, Some(successor));
                self.graph.set_left(successor, Some(left));
                let color = node::color(&self.graph, Some(id));
                self.paint(successor, color);
                (Some(successor), successor_right, fixup_parent)
            },
        };

        self.graph.release(id);
        if removed_color == Color::Black {
            self.delete_fixup(fixup_node, fixup_parent);
        }
        replacement
    }

    /// Inserts a key, repairs the coloring, and returns the handle of the new node.
    pub fn insert(&mut self, key: T) -> NodeId
    where
        T: Ord,
    {
        let id = self.graph.insert_leaf(key, Color::Red);
        self.insert_fixup(id);
        id
    }

    /// Removes a node holding `key` and repairs the coloring. Returns the node that took over its
    /// position, `None` if the position became empty, or `TreeError::NotFound` if no node holds
    /// `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    /// use balanced_trees::TreeError;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.delete(&1), Ok(None));
    /// assert_eq!(tree.delete(&1), Err(TreeError::NotFound));
    /// ```
    pub fn delete<V>(&mut self, key: &V) -> Result<Option<NodeId>>
    where
        T: Borrow<V> + Ord,
        V: Ord + ?Sized,
    {
        let id = self.graph.find(key)?;
        Ok(self.remove_node(id))
    }

    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V> + Ord,
        V: Ord + ?Sized,
    {
        self.graph.search(key).is_some()
    }

    /// Returns a view of a node holding `key`, if any.
    pub fn search<V>(&self, key: &V) -> Option<NodeRef<'_, T, Color>>
    where
        T: Borrow<V> + Ord,
        V: Ord + ?Sized,
    {
        self.graph.search(key).map(|id| NodeRef::new(&self.graph, id))
    }

    /// Returns the minimum key, or `TreeError::EmptyTree`.
    pub fn min(&self) -> Result<&T> {
        self.graph.min_key()
    }

    /// Returns the maximum key, or `TreeError::EmptyTree`.
    pub fn max(&self) -> Result<&T> {
        self.graph.max_key()
    }

    /// Returns the key that follows `key` in order. Fails with `TreeError::NotFound` if `key` is
    /// absent and `TreeError::NoSuccessor` if it is the maximum.
    pub fn successor<V>(&self, key: &V) -> Result<&T>
    where
        T: Borrow<V> + Ord,
        V: Ord + ?Sized,
    {
        self.graph.successor_key(key)
    }

    /// Returns the key that precedes `key` in order. Fails with `TreeError::NotFound` if `key` is
    /// absent and `TreeError::NoPredecessor` if it is the minimum.
    pub fn predecessor<V>(&self, key: &V) -> Result<&T>
    where
        T: Borrow<V> + Ord,
        V: Ord + ?Sized,
    {
        self.graph.predecessor_key(key)
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn clear(&mut self) {
        self.graph.clear();
    }

    /// Returns the number of edges on the longest root-to-leaf path, or `None` if the tree is
    /// empty.
    pub fn height(&self) -> Option<usize> {
        self.graph.height()
    }

    pub fn root(&self) -> Option<NodeRef<'_, T, Color>> {
        self.graph.root().map(|id| NodeRef::new(&self.graph, id))
    }

    /// Returns a view of the node behind `id`, or `None` if it has been deleted.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, T, Color>> {
        self.graph.get(id)
    }

    pub fn traverse(&self, order: Order) -> Traversal<'_, T, Color> {
        self.graph.traverse(order)
    }

    /// Returns an iterator over the keys in ascending order.
    pub fn iter(&self) -> Traversal<'_, T, Color> {
        self.traverse(Order::InOrder)
    }

    /// Checks the link and ordering invariants and the three coloring invariants.
    pub fn assert_valid(&self) -> std::result::Result<(), String>
    where
        T: Ord + Debug,
    {
        self.graph.check_structure()?;
        if self.is_red(self.graph.root()) {
            return Err("root is red".to_string());
        }

        // black nodes on any path from a node down to a sentinel, counting the sentinel
        let mut black_heights: HashMap<NodeId, usize> = HashMap::new();
        let black_height = |heights: &HashMap<NodeId, usize>, child: Option<NodeId>| {
            child.map_or(1, |child| heights[&child])
        };

        let mut nodes = self.graph.traverse(Order::PostOrder);
        while let Some(id) = nodes.next_id() {
            let left = self.graph.left(id);
            let right = self.graph.right(id);
            if self.is_red(Some(id)) && (self.is_red(left) || self.is_red(right)) {
                return Err(format!("red {:?} has a red child", self.graph.key(id)));
            }

            let left_height = black_height(&black_heights, left);
            let right_height = black_height(&black_heights, right);
            if left_height != right_height {
                return Err(format!(
                    "{:?} has black heights {} and {} below it",
                    self.graph.key(id),
                    left_height,
                    right_height,
                ));
            }
            let own = if self.is_black(Some(id)) { 1 } else { 0 };
            black_heights.insert(id, left_height + own);
        }
        Ok(())
    }
}

impl<'a, T> IntoIterator for &'a RedBlackTree<T>
where
    T: 'a,
{
    type IntoIter = Traversal<'a, T, Color>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}
