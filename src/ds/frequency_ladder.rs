//! Frequency-bucketed key tracking for the LFU policy.
//!
//! Each key owns a node carrying its access count; nodes with the same
//! count live in one FIFO bucket (pushed to the back, evicted from the
//! head). Buckets sit in an ordered map keyed by frequency, so the
//! smallest non-empty bucket is always the map's first entry and a bucket
//! that drains, whether through promotion or deletion, simply disappears
//! from the map:
//!
//! ```text
//!   buckets (ordered by frequency)
//!       │
//!       ├── 1: k4 → k7          ◄── lfu_key() = k4 (oldest at minimum)
//!       ├── 3: k1
//!       └── 8: k2 → k9
//!           head ──── tail
//! ```
//!
//! `lfu_key` therefore always names the oldest key of the smallest
//! non-empty bucket, with no ordering precondition on the caller.

use std::collections::BTreeMap;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::arena::{NodeArena, NodeId};

#[derive(Debug)]
struct Entry<K> {
    key: K,
    freq: u64,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

#[derive(Debug, Default)]
struct Bucket {
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

/// Access-frequency ladder: an ordered map of freq → FIFO key bucket.
#[derive(Debug)]
pub struct FrequencyLadder<K> {
    arena: NodeArena<Entry<K>>,
    index: FxHashMap<K, NodeId>,
    buckets: BTreeMap<u64, Bucket>,
}

impl<K> FrequencyLadder<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty ladder.
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            index: FxHashMap::default(),
            buckets: BTreeMap::new(),
        }
    }

    /// Creates an empty ladder with reserved key capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: NodeArena::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: BTreeMap::new(),
        }
    }

    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if `key` is tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the access count recorded for `key`.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.arena.get(id).map(|entry| entry.freq)
    }

    /// Returns the smallest access count present, or 0 when empty.
    pub fn min_freq(&self) -> u64 {
        self.buckets
            .first_key_value()
            .map(|(&freq, _)| freq)
            .unwrap_or(0)
    }

    /// Records an access to `key`.
    ///
    /// A new key enters the ladder at frequency 1; an existing key moves
    /// to the back of the next bucket.
    pub fn inc(&mut self, key: K) {
        if let Some(&id) = self.index.get(&key) {
            let freq = self.arena.get(id).expect("bumped entry missing").freq;
            self.unlink_at(freq, id);
            // At the count ceiling the key re-enters its own bucket, which
            // refreshes its FIFO position instead of promoting it.
            self.push_back_at(freq.saturating_add(1), id);
            return;
        }

        let id = self.arena.insert(Entry {
            key: key.clone(),
            freq: 1,
            prev: None,
            next: None,
        });
        self.index.insert(key, id);
        self.push_back_at(1, id);
    }

    /// Forgets `key`. Forgetting an untracked key is a no-op.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(id) = self.index.remove(key) else {
            return false;
        };
        let freq = self.arena.get(id).expect("indexed entry missing").freq;
        self.unlink_at(freq, id);
        self.arena.remove(id);
        true
    }

    /// Returns the least frequently used key: the oldest member of the
    /// smallest non-empty bucket. `None` when the ladder is empty.
    pub fn lfu_key(&self) -> Option<&K> {
        let (_, bucket) = self.buckets.first_key_value()?;
        let id = bucket.head?;
        self.arena.get(id).map(|entry| &entry.key)
    }

    /// Drops all tracked keys.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.index.clear();
        self.buckets.clear();
    }

    /// Appends the node to the bucket for `freq`, creating the bucket on
    /// first use, and stamps the node with its new count.
    fn push_back_at(&mut self, freq: u64, id: NodeId) {
        let old_tail = self.buckets.get(&freq).and_then(|bucket| bucket.tail);

        if let Some(entry) = self.arena.get_mut(id) {
            entry.freq = freq;
            entry.prev = old_tail;
            entry.next = None;
        }
        if let Some(tail_id) = old_tail
            && let Some(tail) = self.arena.get_mut(tail_id)
        {
            tail.next = Some(id);
        }

        let bucket = self.buckets.entry(freq).or_default();
        if bucket.head.is_none() {
            bucket.head = Some(id);
        }
        bucket.tail = Some(id);
    }

    /// Detaches the node from the bucket for `freq`; a drained bucket is
    /// dropped from the map so the first entry stays the minimum.
    fn unlink_at(&mut self, freq: u64, id: NodeId) {
        let (prev, next) = {
            let entry = self.arena.get(id).expect("unlinked entry missing");
            (entry.prev, entry.next)
        };

        match prev {
            Some(prev_id) => {
                if let Some(prev_entry) = self.arena.get_mut(prev_id) {
                    prev_entry.next = next;
                }
            },
            None => {
                if let Some(bucket) = self.buckets.get_mut(&freq) {
                    bucket.head = next;
                }
            },
        }
        match next {
            Some(next_id) => {
                if let Some(next_entry) = self.arena.get_mut(next_id) {
                    next_entry.prev = prev;
                }
            },
            None => {
                if let Some(bucket) = self.buckets.get_mut(&freq) {
                    bucket.tail = prev;
                }
            },
        }

        if let Some(entry) = self.arena.get_mut(id) {
            entry.prev = None;
            entry.next = None;
        }

        if self
            .buckets
            .get(&freq)
            .is_some_and(|bucket| bucket.head.is_none())
        {
            self.buckets.remove(&freq);
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.arena.len(), self.index.len());

        if self.is_empty() {
            assert!(self.buckets.is_empty());
            assert_eq!(self.min_freq(), 0);
            return;
        }

        assert!(self.min_freq() > 0);

        let mut total = 0usize;
        for (&freq, bucket) in &self.buckets {
            assert!(bucket.head.is_some(), "empty bucket {freq} retained");

            let mut current = bucket.head;
            let mut last = None;
            while let Some(id) = current {
                let entry = self.arena.get(id).expect("bucket entry missing");
                assert_eq!(entry.freq, freq);
                assert_eq!(entry.prev, last);
                assert_eq!(self.index.get(&entry.key), Some(&id));
                last = Some(id);
                current = entry.next;
                total += 1;
                assert!(total <= self.len(), "cycle detected in bucket {freq}");
            }
            assert_eq!(bucket.tail, last);
        }
        assert_eq!(total, self.len());
    }
}

impl<K> Default for FrequencyLadder<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
