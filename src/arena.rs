//! Chunked slot allocator that owns every node of a tree.
//!
//! Trees address their nodes through `NodeId` handles rather than references, so a rotation is a
//! handful of handle writes. Lookups through a stale handle are detectable: `get` answers `None`
//! for a released slot, and releasing a slot twice panics without corrupting the free list.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A stable handle to a value stored in a `NodeArena<T>`.
///
/// Handles stay valid until the value is released. A released slot is recycled by the next
/// allocation, so a handle kept past the release of its value may later point at a different
/// value.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId {
    chunk: usize,
    slot: usize,
}

enum Slot<T> {
    Occupied(T),
    Vacant(Option<NodeId>),
}

/// An allocator for a single type of value, addressed by `NodeId` handles.
///
/// Values are stored in fixed-size chunks, so growing the arena never moves existing values.
/// Released slots are threaded onto a free list and reused before a new chunk is allocated. All
/// remaining values are dropped together with the arena.
///
/// # Examples
///
/// ```
/// use balanced_trees::arena::NodeArena;
///
/// let mut arena = NodeArena::new(1024);
///
/// let x = arena.alloc(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.release(x), 2);
/// assert!(arena.is_empty());
/// ```
pub struct NodeArena<T> {
    free_head: Option<NodeId>,
    chunks: Vec<Vec<Slot<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> NodeArena<T> {
    fn has_slot(&self, id: NodeId) -> bool {
        id.chunk < self.chunks.len() && id.slot < self.chunks[id.chunk].len()
    }

    /// Constructs a new, empty `NodeArena<T>` that grows by `chunk_size` slots at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Expected a positive chunk size.");
        NodeArena {
            free_head: None,
            chunks: Vec::new(),
            chunk_size,
            len: 0,
            capacity: 0,
        }
    }

    /// Moves `value` into the arena and returns its handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::arena::NodeArena;
    ///
    /// let mut arena = NodeArena::new(1024);
    /// let x = arena.alloc(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn alloc(&mut self, value: T) -> NodeId {
        if self.len == self.capacity {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
            self.capacity += self.chunk_size;
        }
        self.len += 1;

        match self.free_head.take() {
            None => {
                let chunk = self.chunks.len() - 1;
                let last_chunk = &mut self.chunks[chunk];
                last_chunk.push(Slot::Occupied(value));
                NodeId {
                    chunk,
                    slot: last_chunk.len() - 1,
                }
            },
            Some(id) => {
                let vacant = mem::replace(&mut self.chunks[id.chunk][id.slot], Slot::Occupied(value));
                match vacant {
                    Slot::Vacant(next_free) => {
                        self.free_head = next_free;
                        id
                    },
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                }
            },
        }
    }

    /// Removes the value behind `id` from the arena and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to an occupied slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::arena::NodeArena;
    ///
    /// let mut arena = NodeArena::new(1024);
    /// let x = arena.alloc(0);
    /// assert_eq!(arena.release(x), 0);
    /// assert_eq!(arena.get(x), None);
    /// ```
    pub fn release(&mut self, id: NodeId) -> T {
        assert!(self.has_slot(id), "Expected a handle to an allocated slot.");
        let old_slot = mem::replace(
            &mut self.chunks[id.chunk][id.slot],
            Slot::Vacant(self.free_head),
        );
        match old_slot {
            Slot::Occupied(value) => {
                self.len -= 1;
                self.free_head = Some(id);
                value
            },
            Slot::Vacant(next_free) => {
                self.chunks[id.chunk][id.slot] = Slot::Vacant(next_free);
                panic!("Expected a handle to an occupied slot.");
            },
        }
    }

    /// Returns a reference to the value behind `id`, or `None` if the slot is vacant or out of
    /// bounds.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        if !self.has_slot(id) {
            return None;
        }
        match self.chunks[id.chunk][id.slot] {
            Slot::Occupied(ref value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to the value behind `id`, or `None` if the slot is vacant or
    /// out of bounds.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        if !self.has_slot(id) {
            return None;
        }
        match self.chunks[id.chunk][id.slot] {
            Slot::Occupied(ref mut value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    /// Returns the number of live values in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every value and frees all chunks. Every outstanding handle is invalidated.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.free_head = None;
        self.len = 0;
        self.capacity = 0;
    }
}

impl<T> Index<NodeId> for NodeArena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id).expect("Expected a handle to a live node.")
    }
}

impl<T> IndexMut<NodeId> for NodeArena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id).expect("Expected a handle to a live node.")
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeArena, NodeId};
    use std::panic;

    #[test]
    #[should_panic]
    fn test_zero_chunk_size() {
        let _: NodeArena<u32> = NodeArena::new(0);
    }

    #[test]
    #[should_panic]
    fn test_release_out_of_bounds() {
        let mut arena: NodeArena<u32> = NodeArena::new(16);
        arena.release(NodeId { chunk: 0, slot: 0 });
    }

    #[test]
    #[should_panic]
    fn test_release_twice() {
        let mut arena = NodeArena::new(16);
        let id = arena.alloc(0);
        arena.release(id);
        arena.release(id);
    }

    #[test]
    fn test_release_twice_keeps_free_list() {
        let mut arena = NodeArena::new(4);
        let a = arena.alloc(0);
        let b = arena.alloc(1);
        arena.release(a);
        arena.release(b);
        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| arena.release(b)));
        assert!(result.is_err());

        assert_eq!(arena.alloc(2), b);
        assert_eq!(arena.alloc(3), a);
        assert_eq!(arena.alloc(4), NodeId { chunk: 0, slot: 2 });
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_alloc_fills_chunks_in_order() {
        let mut arena = NodeArena::new(2);
        assert_eq!(arena.alloc('a'), NodeId { chunk: 0, slot: 0 });
        assert_eq!(arena.alloc('b'), NodeId { chunk: 0, slot: 1 });
        assert_eq!(arena.alloc('c'), NodeId { chunk: 1, slot: 0 });
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_release_recycles_slots() {
        let mut arena = NodeArena::new(4);
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        assert_eq!(arena.release(a), 1);
        assert_eq!(arena.release(b), 2);

        // most recently released slot is handed out first
        assert_eq!(arena.alloc(3), b);
        assert_eq!(arena.alloc(4), a);
        assert_eq!(arena[a], 4);
        assert_eq!(arena[b], 3);
    }

    #[test]
    fn test_recycling_does_not_grow() {
        let mut arena = NodeArena::new(1);
        let id = arena.alloc(0);
        for i in 0..10 {
            arena.release(id);
            assert_eq!(arena.alloc(i), id);
        }
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_get_vacant_and_invalid() {
        let mut arena = NodeArena::new(4);
        let id = arena.alloc(0);
        assert_eq!(arena.get(NodeId { chunk: 0, slot: 1 }), None);
        assert_eq!(arena.get(NodeId { chunk: 3, slot: 0 }), None);
        arena.release(id);
        assert_eq!(arena.get(id), None);
        assert_eq!(arena.get_mut(id), None);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = NodeArena::new(4);
        let id = arena.alloc(0);
        *arena.get_mut(id).unwrap() = 5;
        assert_eq!(arena.get(id), Some(&5));
    }

    #[test]
    fn test_clear() {
        let mut arena = NodeArena::new(2);
        let id = arena.alloc(0);
        arena.alloc(1);
        arena.alloc(2);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.get(id), None);
        assert_eq!(arena.alloc(7), NodeId { chunk: 0, slot: 0 });
    }
}
