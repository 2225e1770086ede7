//! All-keys LFU store.
//!
//! Every `set` and every hit records an access on the frequency ladder; a
//! key's first access enters it at frequency 1. On overflow the store
//! evicts the ladder's pick: the oldest key in the lowest-frequency bucket
//! (FIFO among ties). The victim is selected before the incoming key is
//! inserted, so a new key never evicts itself.

use std::hash::Hash;
use std::time::Duration;

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use rustc_hash::FxHashMap;

use crate::ds::frequency_ladder::FrequencyLadder;
use crate::ds::random_index::RandomIndex;
use crate::item::Item;
use crate::store::Store;

pub const POLICY_NAME: &str = "allkeys-lfu";
pub const DEFAULT_CAPACITY: usize = 10_000;
pub const MINIMUM_CAPACITY: usize = 2;

#[derive(Debug)]
struct Core<K, V> {
    capacity: usize,
    items: FxHashMap<K, Item<V>>,
    random_index: RandomIndex<K>,
    frequency: FrequencyLadder<K>,
}

impl<K, V> Core<K, V>
where
    K: Eq + Hash + Clone,
{
    fn delete(&mut self, key: &K) {
        if self.items.remove(key).is_some() {
            self.random_index.remove(key);
            self.frequency.remove(key);
        }
    }

    fn evict(&mut self) {
        if let Some(victim) = self.frequency.lfu_key().cloned() {
            self.delete(&victim);
        }
    }

    #[cfg(debug_assertions)]
    fn debug_validate_invariants(&self) {
        assert_eq!(self.items.len(), self.random_index.len());
        assert_eq!(self.items.len(), self.frequency.len());
        assert!(self.capacity == 0 || self.items.len() <= self.capacity);
        for key in self.items.keys() {
            assert!(self.random_index.contains(key));
            assert!(self.frequency.contains(key));
        }
        self.random_index.debug_validate_invariants();
        self.frequency.debug_validate_invariants();
    }
}

/// Store evicting the least frequently used key on overflow.
#[derive(Debug)]
pub struct AllKeysLfuStore<K, V> {
    passive_expiration: bool,
    inner: RwLock<Core<K, V>>,
}

impl<K, V> AllKeysLfuStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a store holding at most `capacity` keys.
    ///
    /// A capacity below [`MINIMUM_CAPACITY`] is coerced to
    /// [`DEFAULT_CAPACITY`]; the cache constructors validate capacities
    /// before reaching this point.
    pub fn new(capacity: usize, passive_expiration: bool) -> Self {
        let capacity = if capacity < MINIMUM_CAPACITY {
            DEFAULT_CAPACITY
        } else {
            capacity
        };
        Self {
            passive_expiration,
            inner: RwLock::new(Core {
                capacity,
                items: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
                random_index: RandomIndex::with_capacity(capacity),
                frequency: FrequencyLadder::with_capacity(capacity),
            }),
        }
    }

    /// Returns the recorded access count for `key` (test and diagnostic
    /// support).
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.read().frequency.frequency(key)
    }
}

impl<K, V> Store<K, V> for AllKeysLfuStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn set(&self, key: K, item: Item<V>) {
        let mut core = self.inner.write();

        if core.items.contains_key(&key) {
            core.items.insert(key.clone(), item);
            core.frequency.inc(key);
            return;
        }

        if core.items.len() >= core.capacity {
            core.evict();
        }
        core.random_index.add(key.clone());
        core.frequency.inc(key.clone());
        core.items.insert(key, item);

        #[cfg(debug_assertions)]
        core.debug_validate_invariants();
    }

    fn get(&self, key: &K) -> Option<Item<V>> {
        let mut core = self.inner.write();

        let expired = core.items.get(key)?.is_expired();
        if expired && self.passive_expiration {
            core.delete(key);
            return None;
        }

        core.frequency.inc(key.clone());
        core.items.get(key).cloned()
    }

    fn delete(&self, keys: &[K]) {
        let mut core = self.inner.write();
        for key in keys {
            core.delete(key);
        }

        #[cfg(debug_assertions)]
        core.debug_validate_invariants();
    }

    fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    fn keys(&self) -> Vec<K> {
        self.inner.read().items.keys().cloned().collect()
    }

    fn random_key(&self) -> Option<K> {
        self.inner.read().random_index.random_key()
    }

    fn ttl(&self, key: &K) -> Option<Option<Duration>> {
        self.inner.read().items.get(key).map(|item| item.ttl())
    }

    fn items(&self) -> MappedRwLockReadGuard<'_, FxHashMap<K, Item<V>>> {
        RwLockReadGuard::map(self.inner.read(), |core| &core.items)
    }

    fn flush(&self) {
        let mut core = self.inner.write();
        core.items.clear();
        core.random_index.clear();
        core.frequency.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(capacity: usize) -> AllKeysLfuStore<u32, &'static str> {
        AllKeysLfuStore::new(capacity, false)
    }

    fn keys_sorted(s: &AllKeysLfuStore<u32, &'static str>) -> Vec<u32> {
        let mut keys = s.keys();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn overflow_evicts_least_frequent() {
        let s = store(2);
        s.set(1, Item::new("a"));
        s.set(2, Item::new("b"));
        s.get(&1); // 1: freq 2, 2: freq 1
        s.set(3, Item::new("c"));

        assert_eq!(keys_sorted(&s), vec![1, 3]);
        assert!(s.get(&2).is_none());
    }

    #[test]
    fn ties_evict_oldest_entry_into_min_bucket() {
        let s = store(3);
        for key in 1..=3 {
            s.set(key, Item::new("v"));
        }
        for key in 1..=3 {
            s.get(&key); // all at freq 2; bucket order 1, 2, 3
        }
        s.set(4, Item::new("d"));

        assert_eq!(keys_sorted(&s), vec![2, 3, 4]);
        assert!(s.get(&1).is_none());
    }

    #[test]
    fn new_key_does_not_evict_itself() {
        let s = store(2);
        s.set(1, Item::new("a"));
        s.set(2, Item::new("b"));
        s.get(&1);
        s.get(&2);
        s.set(3, Item::new("c"));

        // Both residents are at freq 2; the incoming key survives and the
        // oldest of the residents goes.
        assert!(s.get(&3).is_some());
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn set_of_resident_key_bumps_frequency() {
        let s = store(2);
        s.set(1, Item::new("a"));
        s.set(2, Item::new("b"));
        s.set(1, Item::new("a2")); // 1: freq 2
        s.set(3, Item::new("c"));

        assert_eq!(keys_sorted(&s), vec![1, 3]);
        assert_eq!(*s.get(&1).unwrap().value(), "a2");
    }

    #[test]
    fn frequencies_are_observable() {
        let s = store(4);
        s.set(1, Item::new("a"));
        s.get(&1);
        s.get(&1);

        assert_eq!(s.frequency(&1), Some(3));
        assert_eq!(s.frequency(&9), None);
    }

    #[test]
    fn delete_forgets_frequency() {
        let s = store(3);
        s.set(1, Item::new("a"));
        s.get(&1);
        s.get(&1);
        s.delete(&[1]);

        // A re-inserted key starts cold again.
        s.set(1, Item::new("a"));
        assert_eq!(s.frequency(&1), Some(1));
    }

    #[test]
    fn deleting_the_min_bucket_keeps_eviction_correct() {
        let s = store(3);
        s.set(1, Item::new("a")); // freq 1
        s.set(2, Item::new("b"));
        s.get(&2); // freq 2
        s.set(3, Item::new("c"));
        s.get(&3); // freq 2

        s.delete(&[1]); // drains the minimum bucket
        s.set(4, Item::new("d"));
        s.get(&4); // freq 2
        s.set(5, Item::new("e")); // forces an eviction

        // Victim must be key 2: oldest entry into the (repaired) minimum.
        assert_eq!(keys_sorted(&s), vec![3, 4, 5]);
    }

    #[test]
    fn passive_expiration_deletes_expired_hit() {
        let s = AllKeysLfuStore::new(4, true);
        s.set(1, Item::expiring("a", Duration::ZERO));
        std::thread::sleep(Duration::from_millis(2));

        assert!(s.get(&1).is_none());
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn flush_resets_frequencies() {
        let s = store(3);
        s.set(1, Item::new("a"));
        s.get(&1);
        s.flush();

        assert_eq!(s.len(), 0);
        assert_eq!(s.frequency(&1), None);

        s.set(1, Item::new("a"));
        assert_eq!(s.frequency(&1), Some(1));
    }
}
