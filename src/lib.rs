//! Ordered binary search trees over a shared arena-backed node graph: an unbalanced
//! [`BinarySearchTree`](bst::BinarySearchTree), a height-balanced
//! [`AvlTree`](avl_tree::AvlTree), and a color-balanced
//! [`RedBlackTree`](red_black_tree::RedBlackTree).
//!
//! All three trees share one surface: `insert`, `delete`, `contains`, `min`, `max`,
//! `successor`, `len`, and lazy traversals in in-order, pre-order, or post-order.
//!
//! # Examples
//!
//! ```
//! use balanced_trees::avl_tree::AvlTree;
//! use balanced_trees::bst::Order;
//! use balanced_trees::TreeError;
//!
//! let mut tree = AvlTree::new();
//! for key in &[3, 8, 1, 10, 5, 9, 7, 18, 30, 25, 38] {
//!     tree.insert(*key);
//! }
//!
//! assert_eq!(
//!     tree.traverse(Order::InOrder).cloned().collect::<Vec<i32>>(),
//!     vec![1, 3, 5, 7, 8, 9, 10, 18, 25, 30, 38],
//! );
//! assert_eq!(tree.successor(&10), Ok(&18));
//!
//! assert!(tree.delete(&10).is_ok());
//! assert_eq!(tree.delete(&10), Err(TreeError::NotFound));
//! ```

pub mod arena;
pub mod avl_tree;
pub mod bst;
mod error;
pub mod red_black_tree;

pub use crate::error::{Result, TreeError};
