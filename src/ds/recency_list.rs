//! Recency-ordered key list for the LRU policies.
//!
//! An arena-backed doubly-linked list of keys plus a key→node map. The
//! front of the list is the most recently used key, the back the least
//! recently used:
//!
//! ```text
//!   head ──► [k3] ◄──► [k1] ◄──► [k2] ◄── tail
//!            MRU                  LRU
//! ```
//!
//! Unlike a bare intrusive list, the key→node index lives inside this type,
//! so callers cannot desynchronize the two. `push_front`, `move_to_front`,
//! `remove`, and `back` are O(1); `iter_from_back` walks tail-to-head and
//! is used for volatile-LRU victim selection.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::arena::{NodeArena, NodeId};

#[derive(Debug)]
struct Node<K> {
    key: K,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Doubly-linked recency list with an internal key→node index.
#[derive(Debug)]
pub struct RecencyList<K> {
    arena: NodeArena<Node<K>>,
    index: FxHashMap<K, NodeId>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl<K> RecencyList<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            index: FxHashMap::default(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: NodeArena::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            head: None,
            tail: None,
        }
    }

    /// Returns the number of keys in the list.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `key` is in the list.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts `key` at the front (MRU). If the key is already present it
    /// is moved to the front instead.
    pub fn push_front(&mut self, key: K) {
        if self.move_to_front(&key) {
            return;
        }
        let id = self.arena.insert(Node {
            key: key.clone(),
            prev: None,
            next: self.head,
        });
        if let Some(old_head) = self.head {
            if let Some(node) = self.arena.get_mut(old_head) {
                node.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
        self.index.insert(key, id);
    }

    /// Moves `key` to the front; returns `false` if it is not present.
    pub fn move_to_front(&mut self, key: &K) -> bool {
        let Some(&id) = self.index.get(key) else {
            return false;
        };
        if self.head == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    /// Removes `key`; returns `false` if it is not present.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(id) = self.index.remove(key) else {
            return false;
        };
        self.detach(id);
        self.arena.remove(id);
        true
    }

    /// Returns the least recently used key without mutating the list.
    pub fn back(&self) -> Option<&K> {
        self.tail
            .and_then(|id| self.arena.get(id).map(|node| &node.key))
    }

    /// Returns the most recently used key without mutating the list.
    pub fn front(&self) -> Option<&K> {
        self.head
            .and_then(|id| self.arena.get(id).map(|node| &node.key))
    }

    /// Iterates keys from the back (LRU) toward the front (MRU).
    pub fn iter_from_back(&self) -> IterFromBack<'_, K> {
        IterFromBack {
            list: self,
            current: self.tail,
        }
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }

    fn detach(&mut self, id: NodeId) {
        let (prev, next) = match self.arena.get(id) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_id) => {
                if let Some(prev_node) = self.arena.get_mut(prev_id) {
                    prev_node.next = next;
                }
            },
            None => self.head = next,
        }

        match next {
            Some(next_id) => {
                if let Some(next_node) = self.arena.get_mut(next_id) {
                    next_node.prev = prev;
                }
            },
            None => self.tail = prev,
        }
    }

    fn attach_front(&mut self, id: NodeId) {
        let old_head = self.head;
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        if let Some(old_head) = old_head {
            if let Some(head_node) = self.arena.get_mut(old_head) {
                head_node.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.arena.len(), self.index.len());

        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len(), 0);
            return;
        }

        let mut count = 0usize;
        let mut current = self.head;
        let mut prev = None;
        while let Some(id) = current {
            let node = self.arena.get(id).expect("linked node missing from arena");
            assert_eq!(node.prev, prev);
            assert_eq!(self.index.get(&node.key), Some(&id));
            prev = Some(id);
            current = node.next;
            count += 1;
            assert!(count <= self.len(), "cycle detected");
        }

        assert_eq!(self.tail, prev);
        assert_eq!(count, self.len());
    }
}

impl<K> Default for RecencyList<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Tail-to-head iterator over a [`RecencyList`].
pub struct IterFromBack<'a, K> {
    list: &'a RecencyList<K>,
    current: Option<NodeId>,
}

impl<'a, K> Iterator for IterFromBack<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.prev;
        Some(&node.key)
    }
}
