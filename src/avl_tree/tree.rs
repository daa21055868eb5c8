use crate::arena::NodeId;
use crate::avl_tree::node::{self, Height};
use crate::bst::{NodeGraph, NodeRef, Order, Traversal, DEFAULT_CHUNK_SIZE};
use crate::error::Result;
use log::trace;
use std::borrow::Borrow;
use std::fmt::Debug;

#[derive(Clone, Copy, PartialEq)]
enum Repair {
    // one restructuring restores every ancestor
    Insert,
    // every level up to the root may need a rotation
    Delete,
}

/// An ordered tree of keys in which the heights of the two subtrees of any node differ by at
/// most one.
///
/// Every node stores the height of its subtree. After an insertion the tree is repaired by
/// walking from the new leaf towards the root and performing at most one single or double
/// rotation. After a deletion heights are recomputed up to the root and the walk may rotate at
/// every level.
///
/// # Examples
///
/// ```
/// use balanced_trees::avl_tree::AvlTree;
///
/// let mut tree = AvlTree::new();
/// for key in 0..7 {
///     tree.insert(key);
/// }
///
/// assert_eq!(tree.height(), Some(2));
/// assert_eq!(tree.root().map(|node| *node.key()), Some(3));
/// assert_eq!(tree.max(), Ok(&6));
///
/// assert!(tree.delete(&3).is_ok());
/// assert!(!tree.contains(&3));
/// assert!(tree.assert_valid().is_ok());
/// ```
pub struct AvlTree<T> {
    graph: NodeGraph<T, Height>,
}

impl<T> AvlTree<T> {
    /// Constructs a new, empty `AvlTree<T>`.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `AvlTree<T>` whose node storage grows by `chunk_size` nodes at a
    /// time.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        AvlTree {
            graph: NodeGraph::new(chunk_size),
        }
    }

    fn rotate_left(&mut self, id: NodeId) -> NodeId {
        let pivot = self.graph.rotate_left(id);
        node::update_height(&mut self.graph, id);
        node::update_height(&mut self.graph, pivot);
        pivot
    }

    fn rotate_right(&mut self, id: NodeId) -> NodeId {
        let pivot = self.graph.rotate_right(id);
        node::update_height(&mut self.graph, id);
        node::update_height(&mut self.graph, pivot);
        pivot
    }

    // Restores the balance of a node whose subtrees differ in height by two.
    fn restructure(&mut self, id: NodeId, balance: i32) {
        if balance > 0 {
            let child = self
                .graph
                .right(id)
                .expect("Expected right child node to be `Some`.");
            if node::balance(&self.graph, child) < 0 {
                trace!("avl: right-left rotation at {:?}", id);
                self.rotate_right(child);
            } else {
                trace!("avl: left rotation at {:?}", id);
            }
            self.rotate_left(id);
        } else {
            let child = self
                .graph
                .left(id)
                .expect("Expected left child node to be `Some`.");
            if node::balance(&self.graph, child) > 0 {
                trace!("avl: left-right rotation at {:?}", id);
                self.rotate_left(child);
            } else {
                trace!("avl: right rotation at {:?}", id);
            }
            self.rotate_right(id);
        }
    }

    fn rebalance(&mut self, start: NodeId, repair: Repair) {
        let mut curr = Some(start);
        while let Some(id) = curr {
            let parent = self.graph.parent(id);
            let balance = node::balance(&self.graph, id);
            if balance > 1 || balance < -1 {
                self.restructure(id, balance);
                if repair == Repair::Insert {
                    break;
                }
            } else {
                node::update_height(&mut self.graph, id);
            }
            curr = parent;
        }
    }

    fn recompute_heights(&mut self, start: NodeId) {
        let mut curr = Some(start);
        while let Some(id) = curr {
            node::update_height(&mut self.graph, id);
            curr = self.graph.parent(id);
        }
    }

    /// Inserts a key, rebalances the tree, and returns the handle of the new node.
    pub fn insert(&mut self, key: T) -> NodeId
    where
        T: Ord,
    {
        let id = self.graph.insert_leaf(key, 0);
        self.rebalance(id, Repair::Insert);
        id
    }

    /// Removes a node holding `key` and rebalances the tree. Returns the node that took over its
    /// position, `None` if the position became empty, or `TreeError::NotFound` if no node holds
    /// `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    /// use balanced_trees::TreeError;
    ///
    /// let mut tree = AvlTree::new();
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
        let unlinked = self.graph.unlink(id);

        let start = match unlinked.replacement {
            // a moved successor left a hole at the bottom of the right subtree
            Some(replacement) => match self.graph.right(replacement) {
                Some(right) => Some(self.graph.minimum(right)),
                None => Some(replacement),
            },
            None => unlinked.resume,
        };
        if let Some(start) = start {
            self.recompute_heights(start);
            self.rebalance(start, Repair::Delete);
        }
        Ok(unlinked.replacement)
    }

    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V> + Ord,
        V: Ord + ?Sized,
    {
        self.graph.search(key).is_some()
    }

    /// Returns a view of a node holding `key`, if any.
    pub fn search<V>(&self, key: &V) -> Option<NodeRef<'_, T, Height>>
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
    /// empty. Reads the height stored at the root.
    pub fn height(&self) -> Option<usize> {
        self.graph.root().map(|root| *self.graph.payload(root) as usize)
    }

    pub fn root(&self) -> Option<NodeRef<'_, T, Height>> {
        self.graph.root().map(|id| NodeRef::new(&self.graph, id))
    }

    /// Returns a view of the node behind `id`, or `None` if it has been deleted.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, T, Height>> {
        self.graph.get(id)
    }

    pub fn traverse(&self, order: Order) -> Traversal<'_, T, Height> {
        self.graph.traverse(order)
    }

    /// Returns an iterator over the keys in ascending order.
    pub fn iter(&self) -> Traversal<'_, T, Height> {
        self.traverse(Order::InOrder)
    }

    /// Checks the link and ordering invariants, the stored heights, and that no node has a
    /// balance factor outside `[-1, 1]`.
    pub fn assert_valid(&self) -> std::result::Result<(), String>
    where
        T: Ord + Debug,
    {
        self.graph.check_structure()?;

        // children are checked before their parent
        let mut nodes = self.graph.traverse(Order::PostOrder);
        while let Some(id) = nodes.next_id() {
            let left = node::height(&self.graph, self.graph.left(id));
            let right = node::height(&self.graph, self.graph.right(id));
            let stored = *self.graph.payload(id);
            if stored != left.max(right) + 1 {
                return Err(format!(
                    "{:?} stores height {} but its children have heights {} and {}",
                    self.graph.key(id),
                    stored,
                    left,
                    right,
                ));
            }
            if (right - left).abs() > 1 {
                return Err(format!(
                    "{:?} has balance factor {}",
                    self.graph.key(id),
                    right - left,
                ));
            }
        }
        Ok(())
    }
}

impl<'a, T> IntoIterator for &'a AvlTree<T>
where
    T: 'a,
{
    type IntoIter = Traversal<'a, T, Height>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::AvlTree;
    use crate::bst::Order;
    use crate::error::TreeError;

    const SCENARIO: [u32; 11] = [3, 8, 1, 10, 5, 9, 7, 18, 30, 25, 38];

    fn pre_order(tree: &AvlTree<u32>) -> Vec<u32> {
        tree.traverse(Order::PreOrder).cloned().collect()
    }

    #[test]
    fn test_len_empty() {
        let tree: AvlTree<u32> = AvlTree::new();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), None);
        assert_eq!(tree.min(), Err(TreeError::EmptyTree));
        assert_eq!(tree.max(), Err(TreeError::EmptyTree));
    }

    #[test]
    fn test_leaf_height() {
        let mut tree = AvlTree::new();
        let id = tree.insert(1);
        let node = tree.node(id).unwrap();
        assert_eq!(node.height(), 0);
        assert_eq!(node.balance_factor(), 0);
    }

    #[test]
    fn test_left_rotation() {
        let mut tree = AvlTree::new();
        tree.insert(1);
        tree.insert(2);
        tree.insert(3);
        assert_eq!(pre_order(&tree), vec![2, 1, 3]);
        assert_eq!(tree.height(), Some(1));
    }

    #[test]
    fn test_right_rotation() {
        let mut tree = AvlTree::new();
        tree.insert(3);
        tree.insert(2);
        tree.insert(1);
        assert_eq!(pre_order(&tree), vec![2, 1, 3]);
    }

    #[test]
    fn test_right_left_rotation() {
        let mut tree = AvlTree::new();
        tree.insert(1);
        tree.insert(3);
        tree.insert(2);
        assert_eq!(pre_order(&tree), vec![2, 1, 3]);
    }

    #[test]
    fn test_left_right_rotation() {
        let mut tree = AvlTree::new();
        tree.insert(3);
        tree.insert(1);
        tree.insert(2);
        assert_eq!(pre_order(&tree), vec![2, 1, 3]);
    }

    #[test]
    fn test_double_rotation_with_taller_subtrees() {
        let mut tree = AvlTree::new();
        for key in &[20, 10, 40, 30, 50, 25] {
            tree.insert(*key);
            assert!(tree.assert_valid().is_ok());
        }
        assert_eq!(pre_order(&tree), vec![30, 20, 10, 25, 40, 50]);
    }

    #[test]
    fn test_scenario_insert() {
        let mut tree = AvlTree::new();
        for key in SCENARIO.iter() {
            tree.insert(*key);
            assert_eq!(tree.assert_valid(), Ok(()));
        }
        assert_eq!(
            tree.iter().cloned().collect::<Vec<u32>>(),
            vec![1, 3, 5, 7, 8, 9, 10, 18, 25, 30, 38],
        );
        assert_eq!(pre_order(&tree), vec![8, 3, 1, 5, 7, 25, 10, 9, 18, 30, 38]);
        assert_eq!(tree.height(), Some(3));
    }

    #[test]
    fn test_scenario_delete() {
        let mut tree = AvlTree::new();
        for key in SCENARIO.iter() {
            tree.insert(*key);
        }

        let replacement = tree.delete(&10).unwrap();
        assert_eq!(replacement.and_then(|id| tree.node(id)).map(|node| *node.key()), Some(18));
        assert!(tree.search(&10).is_none());
        assert_eq!(tree.delete(&10), Err(TreeError::NotFound));
        assert_eq!(tree.len(), 10);
        assert_eq!(
            tree.iter().cloned().collect::<Vec<u32>>(),
            vec![1, 3, 5, 7, 8, 9, 18, 25, 30, 38],
        );
        assert_eq!(pre_order(&tree), vec![8, 3, 1, 5, 7, 25, 18, 9, 30, 38]);
        assert_eq!(tree.assert_valid(), Ok(()));
    }

    #[test]
    fn test_delete_rotates() {
        let mut tree = AvlTree::new();
        for key in &[2, 1, 3, 4] {
            tree.insert(*key);
        }
        assert!(tree.delete(&1).is_ok());
        assert_eq!(pre_order(&tree), vec![3, 2, 4]);
        assert_eq!(tree.assert_valid(), Ok(()));
    }

    #[test]
    fn test_delete_rotates_at_every_level() {
        let mut tree = AvlTree::new();
        for key in &[8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1] {
            tree.insert(*key);
        }
        // every right subtree is one shorter than its sibling
        assert_eq!(pre_order(&tree), vec![8, 5, 3, 2, 1, 4, 7, 6, 11, 10, 9, 12]);
        assert_eq!(tree.height(), Some(4));

        // 11 leans left after the removal, then 8 does
        assert_eq!(tree.delete(&12), Ok(None));
        assert_eq!(pre_order(&tree), vec![5, 3, 2, 1, 4, 8, 7, 6, 10, 9, 11]);
        assert_eq!(tree.height(), Some(3));
        assert_eq!(tree.assert_valid(), Ok(()));
    }

    #[test]
    fn test_insert_restructures_once() {
        let mut tree = AvlTree::new();
        for key in &[6, 4, 9, 2, 5, 8, 10, 1] {
            tree.insert(*key);
        }
        assert_eq!(pre_order(&tree), vec![6, 4, 2, 1, 5, 9, 8, 10]);

        tree.insert(0);
        assert_eq!(pre_order(&tree), vec![6, 4, 1, 0, 2, 5, 9, 8, 10]);
        // ancestors above the rotation keep the heights they had before the insert
        assert_eq!(tree.search(&4).map(|node| node.height()), Some(2));
        assert_eq!(tree.root().map(|node| node.height()), Some(3));
        assert_eq!(tree.search(&1).map(|node| node.height()), Some(1));
        assert_eq!(tree.assert_valid(), Ok(()));
    }

    #[test]
    fn test_delete_sole_node() {
        let mut tree = AvlTree::new();
        tree.insert(1);
        assert_eq!(tree.delete(&1), Ok(None));
        assert!(tree.is_empty());
        assert_eq!(tree.min(), Err(TreeError::EmptyTree));
    }

    #[test]
    fn test_sorted_insert_stays_balanced() {
        let mut tree = AvlTree::new();
        for key in 0..1023u32 {
            tree.insert(key);
        }
        assert_eq!(tree.assert_valid(), Ok(()));
        assert_eq!(tree.height(), Some(9));
        for key in 0..1000u32 {
            assert!(tree.delete(&key).is_ok());
        }
        assert_eq!(tree.assert_valid(), Ok(()));
        assert_eq!(tree.len(), 23);
    }

    #[test]
    fn test_successor() {
        let mut tree = AvlTree::new();
        for key in SCENARIO.iter() {
            tree.insert(*key);
        }
        assert_eq!(tree.successor(&10), Ok(&18));
        assert_eq!(tree.successor(&38), Err(TreeError::NoSuccessor));
        assert_eq!(tree.successor(&11), Err(TreeError::NotFound));
        assert_eq!(tree.predecessor(&8), Ok(&7));
    }
}
