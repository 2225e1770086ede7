//! Key set supporting O(1) uniform random selection under churn.
//!
//! A map's iteration order cannot be assumed uniform, so the stores keep
//! this side index: a dense vector of keys plus a reverse position map.
//! Removal overwrites the vacated slot with the tail key (swap-remove) and
//! repairs the moved key's recorded position, keeping selection O(1).
//!
//! Invariant: `pos[keys[i]] == i` for every `i < keys.len()`, and
//! `keys.len() == pos.len()`.

use std::hash::Hash;

use rand::Rng;
use rustc_hash::FxHashMap;

/// Dense key vector + reverse map enabling uniform random picks.
#[derive(Debug)]
pub struct RandomIndex<K> {
    keys: Vec<K>,
    pos: FxHashMap<K, usize>,
}

impl<K> RandomIndex<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            pos: FxHashMap::default(),
        }
    }

    /// Creates an empty index with reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            pos: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns `true` if `key` is tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.pos.contains_key(key)
    }

    /// Adds `key` to the index. Adding a tracked key is a no-op.
    pub fn add(&mut self, key: K) {
        if self.pos.contains_key(&key) {
            return;
        }
        self.keys.push(key.clone());
        self.pos.insert(key, self.keys.len() - 1);
    }

    /// Removes `key` by swapping the tail key into its slot.
    ///
    /// Removing an untracked key is a no-op.
    pub fn remove(&mut self, key: &K) {
        let Some(index) = self.pos.remove(key) else {
            return;
        };

        let is_last = index == self.keys.len() - 1;
        self.keys.swap_remove(index);
        if !is_last {
            self.pos.insert(self.keys[index].clone(), index);
        }
    }

    /// Returns a uniformly random tracked key, or `None` when empty.
    pub fn random_key(&self) -> Option<K> {
        if self.keys.is_empty() {
            return None;
        }
        let index = rand::rng().random_range(0..self.keys.len());
        Some(self.keys[index].clone())
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.pos.clear();
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.keys.len(), self.pos.len());
        for (i, key) in self.keys.iter().enumerate() {
            assert_eq!(self.pos.get(key), Some(&i), "pos out of sync at slot {i}");
        }
    }
}

impl<K> Default for RandomIndex<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_contains() {
        let mut index = RandomIndex::new();
        index.add(1);
        index.add(2);

        assert_eq!(index.len(), 2);
        assert!(index.contains(&1));
        assert!(index.contains(&2));
        assert!(!index.contains(&3));
        index.debug_validate_invariants();
    }

    #[test]
    fn add_is_idempotent() {
        let mut index = RandomIndex::new();
        index.add(1);
        index.add(1);
        assert_eq!(index.len(), 1);
        index.debug_validate_invariants();
    }

    #[test]
    fn remove_swaps_tail_into_slot() {
        let mut index = RandomIndex::new();
        for key in 1..=4 {
            index.add(key);
        }

        index.remove(&1);
        assert_eq!(index.len(), 3);
        assert!(!index.contains(&1));
        index.debug_validate_invariants();

        // Removing the tail key exercises the no-swap path.
        index.remove(&2);
        assert_eq!(index.len(), 2);
        index.debug_validate_invariants();
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut index = RandomIndex::new();
        index.add(1);
        index.remove(&9);
        assert_eq!(index.len(), 1);
        index.debug_validate_invariants();
    }

    #[test]
    fn random_key_on_empty_is_none() {
        let index: RandomIndex<u32> = RandomIndex::new();
        assert_eq!(index.random_key(), None);
    }

    #[test]
    fn random_key_returns_tracked_key() {
        let mut index = RandomIndex::new();
        for key in 0..8 {
            index.add(key);
        }
        for _ in 0..32 {
            let key = index.random_key().unwrap();
            assert!(index.contains(&key));
        }
    }

    #[test]
    fn random_key_covers_all_keys() {
        let mut index = RandomIndex::new();
        for key in 0..4 {
            index.add(key);
        }

        let mut seen = [false; 4];
        for _ in 0..400 {
            seen[index.random_key().unwrap() as usize] = true;
        }
        assert!(seen.iter().all(|&hit| hit), "draws missed a key: {seen:?}");
    }

    #[test]
    fn clear_empties_index() {
        let mut index = RandomIndex::new();
        index.add(1);
        index.add(2);
        index.clear();

        assert!(index.is_empty());
        assert_eq!(index.random_key(), None);
        index.debug_validate_invariants();
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            /// Invariants hold under any interleaving of add/remove/clear.
            #[test]
            fn prop_invariants_always_hold(
                ops in prop::collection::vec((0u8..3, 0u16..64), 0..200)
            ) {
                let mut index = RandomIndex::new();
                for (op, key) in ops {
                    match op {
                        0 => index.add(key),
                        1 => index.remove(&key),
                        _ => {
                            if let Some(drawn) = index.random_key() {
                                prop_assert!(index.contains(&drawn));
                            }
                        },
                    }
                    index.debug_validate_invariants();
                }
            }

            /// After adds minus removes, exactly the surviving keys remain.
            #[test]
            fn prop_membership_matches_history(
                adds in prop::collection::hash_set(0u16..128, 0..64),
                removes in prop::collection::hash_set(0u16..128, 0..64),
            ) {
                let mut index = RandomIndex::new();
                for &key in &adds {
                    index.add(key);
                }
                for key in &removes {
                    index.remove(key);
                }

                for key in &adds {
                    prop_assert_eq!(index.contains(key), !removes.contains(key));
                }
                index.debug_validate_invariants();
            }
        }
    }
}
