use crate::arena::NodeId;
use crate::bst::graph::{NodeGraph, DEFAULT_CHUNK_SIZE};
use crate::bst::node::NodeRef;
use crate::bst::traversal::{Order, Traversal};
use crate::error::Result;
use std::borrow::Borrow;
use std::fmt::Debug;

/// An ordered tree of keys with no balancing.
///
/// Operations cost O(height), which degrades to O(n) when keys arrive in sorted order. Keys equal
/// to an existing key are stored in its right subtree.
///
/// # Examples
///
/// ```
/// use balanced_trees::bst::{BinarySearchTree, Order};
///
/// let mut tree = BinarySearchTree::new();
/// tree.insert(3);
/// tree.insert(1);
/// tree.insert(8);
///
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.min(), Ok(&1));
/// assert_eq!(tree.successor(&3), Ok(&8));
/// assert_eq!(tree.traverse(Order::PreOrder).collect::<Vec<&u32>>(), vec![&3, &1, &8]);
///
/// assert!(tree.delete(&3).is_ok());
/// assert!(tree.delete(&3).is_err());
/// ```
pub struct BinarySearchTree<T> {
    graph: NodeGraph<T, ()>,
}

impl<T> BinarySearchTree<T> {
    /// Constructs a new, empty `BinarySearchTree<T>`.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `BinarySearchTree<T>` whose node storage grows by `chunk_size`
    /// nodes at a time.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        BinarySearchTree {
            graph: NodeGraph::new(chunk_size),
        }
    }

    /// Inserts a key and returns the handle of the new leaf.
    pub fn insert(&mut self, key: T) -> NodeId
    where
        T: Ord,
    {
        self.graph.insert_leaf(key, ())
    }

    /// Removes a node holding `key`. Returns the node that took over its position, `None` if the
    /// position became empty, or `TreeError::NotFound` if no node holds `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::bst::BinarySearchTree;
    /// use balanced_trees::TreeError;
    ///
    /// let mut tree = BinarySearchTree::new();
    /// tree.insert(2);
    /// tree.insert(1);
    /// let replacement = tree.delete(&2).unwrap().unwrap();
    /// assert_eq!(tree.node(replacement).map(|node| *node.key()), Some(1));
    /// assert_eq!(tree.delete(&2), Err(TreeError::NotFound));
    /// ```
    pub fn delete<V>(&mut self, key: &V) -> Result<Option<NodeId>>
    where
        T: Borrow<V> + Ord,
        V: Ord + ?Sized,
    {
        let id = self.graph.find(key)?;
        Ok(self.graph.unlink(id).replacement)
    }

    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V> + Ord,
        V: Ord + ?Sized,
    {
        self.graph.search(key).is_some()
    }

    /// Returns a view of a node holding `key`, if any.
    pub fn search<V>(&self, key: &V) -> Option<NodeRef<'_, T, ()>>
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

    pub fn root(&self) -> Option<NodeRef<'_, T, ()>> {
        self.graph.root().map(|id| NodeRef::new(&self.graph, id))
    }

    /// Returns a view of the node behind `id`, or `None` if it has been deleted.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, T, ()>> {
        self.graph.get(id)
    }

    pub fn traverse(&self, order: Order) -> Traversal<'_, T, ()> {
        self.graph.traverse(order)
    }

    /// Returns an iterator over the keys in ascending order.
    pub fn iter(&self) -> Traversal<'_, T, ()> {
        self.traverse(Order::InOrder)
    }

    /// Checks the link and ordering invariants, describing the first violation found.
    pub fn assert_valid(&self) -> std::result::Result<(), String>
    where
        T: Ord + Debug,
    {
        self.graph.check_structure()
    }
}

impl<'a, T> IntoIterator for &'a BinarySearchTree<T>
where
    T: 'a,
{
    type IntoIter = Traversal<'a, T, ()>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Default for BinarySearchTree<T> {
    fn default() -> Self {
        Self::new()
    }
}
