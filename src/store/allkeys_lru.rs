//! # All-keys LRU store
//!
//! Evicts the least recently used key, expiring or not, when a new key
//! would push the store past its capacity.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────┐
//!   │                 AllKeysLruStore<K, V>                         │
//!   │                                                               │
//!   │   RwLock<Core> ── one lock guards all three indices           │
//!   │                                                               │
//!   │   items:        FxHashMap<K, Item<V>>   (primary storage)     │
//!   │   random_index: RandomIndex<K>          (uniform random pick) │
//!   │   recency:      RecencyList<K>                                │
//!   │                                                               │
//!   │      head ──► [D] ◄──► [A] ◄──► [B] ◄── tail                  │
//!   │               MRU                LRU ── eviction victim       │
//!   └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Op | Lock | Effect |
//! |---|---|---|
//! | `set` (new key)      | write | evict tail if full, insert at front |
//! | `set` (resident key) | write | overwrite value, move to front      |
//! | `get` (hit)          | write | move to front                       |
//! | `delete` / `flush`   | write | drop from all indices               |
//! | `len` / `keys` / `ttl` / `random_key` / `items` | read | none      |
//!
//! Every mutation keeps the three indices in lock-step: a key is resident
//! in all of them or in none.

use std::hash::Hash;
use std::time::Duration;

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use rustc_hash::FxHashMap;

use crate::ds::random_index::RandomIndex;
use crate::ds::recency_list::RecencyList;
use crate::item::Item;
use crate::store::Store;

pub const POLICY_NAME: &str = "allkeys-lru";
pub const DEFAULT_CAPACITY: usize = 10_000;
pub const MINIMUM_CAPACITY: usize = 2;

#[derive(Debug)]
struct Core<K, V> {
    capacity: usize,
    items: FxHashMap<K, Item<V>>,
    random_index: RandomIndex<K>,
    recency: RecencyList<K>,
}

impl<K, V> Core<K, V>
where
    K: Eq + Hash + Clone,
{
    fn delete(&mut self, key: &K) {
        if self.items.remove(key).is_some() {
            self.random_index.remove(key);
            self.recency.remove(key);
        }
    }

    fn evict(&mut self) {
        if let Some(victim) = self.recency.back().cloned() {
            self.delete(&victim);
        }
    }

    #[cfg(debug_assertions)]
    fn debug_validate_invariants(&self) {
        assert_eq!(self.items.len(), self.random_index.len());
        assert_eq!(self.items.len(), self.recency.len());
        assert!(self.capacity == 0 || self.items.len() <= self.capacity);
        for key in self.items.keys() {
            assert!(self.random_index.contains(key));
            assert!(self.recency.contains(key));
        }
        self.random_index.debug_validate_invariants();
        self.recency.debug_validate_invariants();
    }
}

/// Store evicting the least recently used key on overflow.
#[derive(Debug)]
pub struct AllKeysLruStore<K, V> {
    passive_expiration: bool,
    inner: RwLock<Core<K, V>>,
}

impl<K, V> AllKeysLruStore<K, V>
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
                recency: RecencyList::with_capacity(capacity),
            }),
        }
    }
}

impl<K, V> Store<K, V> for AllKeysLruStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn set(&self, key: K, item: Item<V>) {
        let mut core = self.inner.write();

        if core.items.contains_key(&key) {
            core.items.insert(key.clone(), item);
            core.recency.move_to_front(&key);
            return;
        }

        if core.items.len() >= core.capacity {
            core.evict();
        }
        core.random_index.add(key.clone());
        core.recency.push_front(key.clone());
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

        core.recency.move_to_front(key);
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
        core.recency.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(capacity: usize) -> AllKeysLruStore<u32, &'static str> {
        AllKeysLruStore::new(capacity, false)
    }

    fn keys_sorted(s: &AllKeysLruStore<u32, &'static str>) -> Vec<u32> {
        let mut keys = s.keys();
        keys.sort_unstable();
        keys
    }

    mod eviction {
        use super::*;

        #[test]
        fn overflow_evicts_oldest_insertion() {
            let s = store(2);
            s.set(1, Item::new("a"));
            s.set(2, Item::new("b"));
            s.set(3, Item::new("c"));

            assert_eq!(s.len(), 2);
            assert!(s.get(&1).is_none());
            assert_eq!(keys_sorted(&s), vec![2, 3]);
        }

        #[test]
        fn get_promotes_and_changes_victim() {
            let s = store(2);
            s.set(1, Item::new("a"));
            s.set(2, Item::new("b"));
            s.get(&1);
            s.set(3, Item::new("c"));

            assert_eq!(keys_sorted(&s), vec![1, 3]);
            assert!(s.get(&2).is_none());
        }

        #[test]
        fn update_promotes_without_eviction() {
            let s = store(2);
            s.set(1, Item::new("a"));
            s.set(2, Item::new("b"));
            s.set(1, Item::new("a2"));
            s.set(3, Item::new("c"));

            // Updating key 1 made key 2 the LRU victim.
            assert_eq!(keys_sorted(&s), vec![1, 3]);
            assert_eq!(*s.get(&1).unwrap().value(), "a2");
        }

        #[test]
        fn victim_is_chosen_among_resident_keys() {
            let s = store(2);
            s.set(1, Item::new("a"));
            s.set(2, Item::new("b"));
            s.set(3, Item::new("c"));

            // The incoming key survives its own insertion.
            assert!(s.get(&3).is_some());
        }
    }

    mod contract {
        use super::*;

        #[test]
        fn delete_ignores_missing_keys() {
            let s = store(4);
            s.set(1, Item::new("a"));
            s.delete(&[1, 2, 3]);
            assert_eq!(s.len(), 0);
        }

        #[test]
        fn flush_empties_every_index() {
            let s = store(4);
            s.set(1, Item::new("a"));
            s.set(2, Item::new("b"));
            s.flush();

            assert_eq!(s.len(), 0);
            assert_eq!(s.random_key(), None);
            assert!(s.keys().is_empty());

            // Store remains usable after flush.
            s.set(3, Item::new("c"));
            assert_eq!(s.len(), 1);
        }

        #[test]
        fn passive_expiration_deletes_expired_hit() {
            let s = AllKeysLruStore::new(4, true);
            s.set(1, Item::expiring("a", Duration::ZERO));
            std::thread::sleep(Duration::from_millis(2));

            assert!(s.get(&1).is_none());
            assert_eq!(s.len(), 0);
        }

        #[test]
        fn below_minimum_capacity_coerces_to_default() {
            let s = store(1);
            for key in 0..3 {
                s.set(key, Item::new("v"));
            }
            // Capacity was coerced to the default, so nothing was evicted.
            assert_eq!(s.len(), 3);
        }

        #[test]
        fn ttl_does_not_promote() {
            let s = store(2);
            s.set(1, Item::new("a"));
            s.set(2, Item::new("b"));
            s.ttl(&1);
            s.set(3, Item::new("c"));

            // Key 1 stayed LRU despite the ttl read.
            assert!(s.get(&1).is_none());
            assert_eq!(keys_sorted(&s), vec![2, 3]);
        }
    }
}
