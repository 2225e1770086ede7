//! Volatile-LRU store: prefers expiring keys for eviction.
//!
//! On overflow the recency list is scanned from the tail (LRU end) toward
//! the head; the first key whose item carries an expiry is evicted, whether
//! or not that expiry has passed. When no resident key carries an expiry
//! the store falls back to plain LRU and evicts the tail.
//!
//! ```text
//!   head ──► [A] ◄──► [B*] ◄──► [C] ◄──► [D*] ◄── tail      (* = expiring)
//!
//!   scan order: D*, C, B*, A  →  D* is evicted (first volatile from tail)
//!   with no volatile keys:    →  the tail itself is evicted (plain LRU)
//! ```
//!
//! Everything else (promotion on `get`, index choreography, locking) works
//! exactly like the all-keys LRU store.

use std::hash::Hash;
use std::time::Duration;

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use rustc_hash::FxHashMap;

use crate::ds::random_index::RandomIndex;
use crate::ds::recency_list::RecencyList;
use crate::item::Item;
use crate::store::Store;

pub const POLICY_NAME: &str = "volatile-lru";
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

    /// Evicts the least recently used volatile key, or the plain LRU tail
    /// when nothing in the store carries an expiry.
    fn evict(&mut self) {
        let victim = self
            .recency
            .iter_from_back()
            .find(|key| {
                self.items
                    .get(*key)
                    .map(|item| item.is_volatile())
                    .unwrap_or(false)
            })
            .or_else(|| self.recency.back())
            .cloned();

        if let Some(key) = victim {
            self.delete(&key);
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

/// Store evicting the least recently used expiring key on overflow.
#[derive(Debug)]
pub struct VolatileLruStore<K, V> {
    passive_expiration: bool,
    inner: RwLock<Core<K, V>>,
}

impl<K, V> VolatileLruStore<K, V>
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

impl<K, V> Store<K, V> for VolatileLruStore<K, V>
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
