//! Store that never evicts: a full cache refuses new keys.
//!
//! With `capacity == 0` the store is unbounded. With a positive capacity,
//! inserting a new key into a full store is a silent no-op while updates to
//! resident keys always succeed. The only auxiliary index is the random
//! index backing `random_key`.

use std::hash::Hash;
use std::time::Duration;

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use rustc_hash::FxHashMap;

use crate::ds::random_index::RandomIndex;
use crate::item::Item;
use crate::store::Store;

pub const POLICY_NAME: &str = "noevict";
pub const DEFAULT_CAPACITY: usize = 0;
pub const MINIMUM_CAPACITY: usize = 0;

#[derive(Debug)]
struct Core<K, V> {
    capacity: usize,
    items: FxHashMap<K, Item<V>>,
    random_index: RandomIndex<K>,
}

impl<K, V> Core<K, V>
where
    K: Eq + Hash + Clone,
{
    fn delete(&mut self, key: &K) {
        if self.items.remove(key).is_some() {
            self.random_index.remove(key);
        }
    }

    fn at_capacity(&self) -> bool {
        self.capacity > 0 && self.items.len() >= self.capacity
    }

    #[cfg(debug_assertions)]
    fn debug_validate_invariants(&self) {
        assert_eq!(self.items.len(), self.random_index.len());
        for key in self.items.keys() {
            assert!(self.random_index.contains(key));
        }
        self.random_index.debug_validate_invariants();
    }
}

/// Capped or unbounded store without eviction.
#[derive(Debug)]
pub struct NoEvictionStore<K, V> {
    passive_expiration: bool,
    inner: RwLock<Core<K, V>>,
}

impl<K, V> NoEvictionStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a store holding at most `capacity` keys (0 = unbounded).
    pub fn new(capacity: usize, passive_expiration: bool) -> Self {
        Self {
            passive_expiration,
            inner: RwLock::new(Core {
                capacity,
                items: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
                random_index: RandomIndex::with_capacity(capacity),
            }),
        }
    }
}

impl<K, V> Store<K, V> for NoEvictionStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn set(&self, key: K, item: Item<V>) {
        let mut core = self.inner.write();

        if core.items.contains_key(&key) {
            core.items.insert(key, item);
            return;
        }
        if core.at_capacity() {
            return;
        }

        core.random_index.add(key.clone());
        core.items.insert(key, item);

        #[cfg(debug_assertions)]
        core.debug_validate_invariants();
    }

    fn get(&self, key: &K) -> Option<Item<V>> {
        if !self.passive_expiration {
            return self.inner.read().items.get(key).cloned();
        }

        let mut core = self.inner.write();
        let expired = core.items.get(key)?.is_expired();
        if expired {
            core.delete(key);
            return None;
        }
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
    }
}
