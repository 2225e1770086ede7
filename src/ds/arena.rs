//! Slotted node storage with stable `NodeId` handles.
//!
//! Backs the linked structures in this crate ([`RecencyList`],
//! [`FrequencyLadder`]) so their prev/next links are plain
//! `Option<NodeId>` values instead of owning pointers. Vacant slots form an
//! intrusive free list: each vacant slot stores the index of the next free
//! slot, so no side allocation is needed to recycle them.
//!
//! ```text
//!   slots: [Occupied(a)] [Vacant(3)] [Occupied(b)] [Vacant(None)]
//!                             ^                         ^
//!   free_head ────────────────┘     (slot 1 → slot 3 → end)
//! ```
//!
//! `insert` / `remove` / `get` are O(1). A `NodeId` stays valid until its
//! slot is removed; the index may then be reused by a later insert.
//!
//! [`RecencyList`]: crate::ds::recency_list::RecencyList
//! [`FrequencyLadder`]: crate::ds::frequency_ladder::FrequencyLadder

/// Stable handle into a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the underlying slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
enum Slot<T> {
    Occupied(T),
    Vacant(Option<usize>),
}

/// Arena that stores nodes in reusable slots and hands out stable ids.
#[derive(Debug)]
pub struct NodeArena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T> NodeArena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    /// Creates an empty arena with reserved slot capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    /// Inserts a node and returns its id, reusing a vacant slot when one
    /// exists.
    pub fn insert(&mut self, node: T) -> NodeId {
        self.len += 1;
        match self.free_head {
            Some(idx) => {
                let next_free = match self.slots[idx] {
                    Slot::Vacant(next) => next,
                    Slot::Occupied(_) => unreachable!("free list points at occupied slot"),
                };
                self.free_head = next_free;
                self.slots[idx] = Slot::Occupied(node);
                NodeId(idx)
            },
            None => {
                self.slots.push(Slot::Occupied(node));
                NodeId(self.slots.len() - 1)
            },
        }
    }

    /// Removes the node at `id`, returning it and recycling the slot.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        match self.slots.get_mut(id.0) {
            Some(slot @ Slot::Occupied(_)) => {
                let old = std::mem::replace(slot, Slot::Vacant(self.free_head));
                self.free_head = Some(id.0);
                self.len -= 1;
                match old {
                    Slot::Occupied(node) => Some(node),
                    Slot::Vacant(_) => unreachable!(),
                }
            },
            _ => None,
        }
    }

    /// Returns a shared reference to the node at `id`, if occupied.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        match self.slots.get(id.0) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// Returns a mutable reference to the node at `id`, if occupied.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.slots.get_mut(id.0) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.0), Some(Slot::Occupied(_)))
    }

    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes all nodes and resets the free list.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        let occupied = self
            .slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Occupied(_)))
            .count();
        assert_eq!(self.len, occupied);

        let mut free_count = 0usize;
        let mut cursor = self.free_head;
        while let Some(idx) = cursor {
            assert!(idx < self.slots.len());
            match &self.slots[idx] {
                Slot::Vacant(next) => cursor = *next,
                Slot::Occupied(_) => panic!("free list points at occupied slot {idx}"),
            }
            free_count += 1;
            assert!(free_count <= self.slots.len());
        }

        assert_eq!(self.slots.len(), occupied + free_count);
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove_roundtrip() {
        let mut arena = NodeArena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), Some(&"b"));

        assert_eq!(arena.remove(a), Some("a"));
        assert_eq!(arena.len(), 1);
        assert!(!arena.contains(a));
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.remove(a), None);
    }

    #[test]
    fn vacant_slots_are_reused() {
        let mut arena = NodeArena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);
        arena.insert(3);

        arena.remove(a);
        arena.remove(b);

        // Most recently freed slot comes back first.
        let d = arena.insert(4);
        assert_eq!(d.index(), b.index());
        let e = arena.insert(5);
        assert_eq!(e.index(), a.index());

        arena.debug_validate_invariants();
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut arena = NodeArena::new();
        let id = arena.insert(10);
        *arena.get_mut(id).unwrap() = 20;
        assert_eq!(arena.get(id), Some(&20));
    }

    #[test]
    fn clear_resets_everything() {
        let mut arena = NodeArena::new();
        let a = arena.insert(1);
        arena.insert(2);
        arena.remove(a);

        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.len(), 0);
        arena.debug_validate_invariants();

        let b = arena.insert(3);
        assert_eq!(b.index(), 0);
    }

    #[test]
    fn out_of_range_id_is_harmless() {
        let mut arena: NodeArena<i32> = NodeArena::new();
        let bogus = NodeId(99);
        assert!(!arena.contains(bogus));
        assert_eq!(arena.get(bogus), None);
        assert_eq!(arena.remove(bogus), None);
    }

    #[test]
    fn churn_keeps_invariants() {
        let mut arena = NodeArena::new();
        let mut ids = Vec::new();
        for i in 0..64 {
            ids.push(arena.insert(i));
        }
        for id in ids.iter().step_by(2) {
            arena.remove(*id);
        }
        for i in 0..16 {
            arena.insert(100 + i);
        }
        arena.debug_validate_invariants();
        assert_eq!(arena.len(), 48);
    }
}
