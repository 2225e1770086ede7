//! Cache façade: the public API over a policy store.
//!
//! A [`Cache`] routes every call to its store, owns the [`Closer`] latch,
//! and, when an active-expiration interval was configured, the single
//! background expirer thread. The store type is a monomorphized generic:
//! one concrete cache type per policy, no dynamic dispatch.
//!
//! | Constructor | Store | Alias |
//! |---|---|---|
//! | [`Cache::open_no_eviction`] | [`NoEvictionStore`] | [`NoEvictionCache`] |
//! | [`Cache::open_lru`] | [`AllKeysLruStore`] | [`AllKeysLruCache`] |
//! | [`Cache::open_volatile_lru`] | [`VolatileLruStore`] | [`VolatileLruCache`] |
//! | [`Cache::open_lfu`] | [`AllKeysLfuStore`] | [`AllKeysLfuCache`] |
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//!
//! use memstash::cache::Cache;
//! use memstash::options::Options;
//!
//! let cache = Cache::open_lru(128, Options::new()).unwrap();
//! cache.set(1u32, "alpha".to_string());
//! cache.set_ex(2u32, "beta".to_string(), Duration::from_secs(60));
//!
//! assert_eq!(cache.get(&1), Some("alpha".to_string()));
//! assert!(cache.ttl(&2).unwrap().is_some());
//!
//! cache.close();
//! ```
//!
//! ## Lifecycle
//!
//! The expirer thread is spawned only when an interval was configured and
//! terminates within one tick of [`Cache::close`]. Dropping the cache
//! closes the latch and joins the thread, so no background work outlives
//! the value. Operations issued after `close` keep working against the
//! in-memory store; `close` only stops background expiration.
//!
//! ## Reentrancy
//!
//! Calling back into the same cache from inside a key or value method
//! (`Hash`, `Eq`, `Clone`) invoked during `get`/`set` deadlocks on the
//! store's lock. Such value types are not supported.

use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::closer::Closer;
use crate::error::ConfigError;
use crate::expire::ExpireStrategy;
use crate::item::Item;
use crate::options::Options;
use crate::store::{
    AllKeysLfuStore, AllKeysLruStore, NoEvictionStore, Store, VolatileLruStore, allkeys_lfu,
    allkeys_lru, no_eviction, volatile_lru,
};

/// Cache backed by the no-eviction store.
pub type NoEvictionCache<K, V> = Cache<K, V, NoEvictionStore<K, V>>;
/// Cache backed by the all-keys LRU store.
pub type AllKeysLruCache<K, V> = Cache<K, V, AllKeysLruStore<K, V>>;
/// Cache backed by the volatile-LRU store.
pub type VolatileLruCache<K, V> = Cache<K, V, VolatileLruStore<K, V>>;
/// Cache backed by the all-keys LFU store.
pub type AllKeysLfuCache<K, V> = Cache<K, V, AllKeysLfuStore<K, V>>;

/// Generic in-memory key-value cache over a policy store `S`.
#[derive(Debug)]
pub struct Cache<K, V, S> {
    store: Arc<S>,
    closer: Arc<Closer>,
    expirer: Option<JoinHandle<()>>,
    _marker: PhantomData<(K, V)>,
}

impl<K, V> NoEvictionCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Opens a cache that refuses new keys once full.
    ///
    /// The capacity defaults to 0 (unbounded) and can be set with
    /// [`Options::with_capacity`].
    pub fn open_no_eviction(options: Options) -> Result<Self, ConfigError> {
        let interval = options.validated_interval()?;
        let capacity = options.capacity.unwrap_or(no_eviction::DEFAULT_CAPACITY);

        let store = NoEvictionStore::new(capacity, options.passive_expiration);
        Ok(Self::start(store, interval, options.expire_strategy))
    }
}

impl<K, V> AllKeysLruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Opens a cache that evicts the least recently used key when full.
    ///
    /// The capacity must be at least 2.
    pub fn open_lru(capacity: usize, options: Options) -> Result<Self, ConfigError> {
        let interval = options.validated_interval()?;
        let capacity = options.capacity.unwrap_or(capacity);
        if capacity < allkeys_lru::MINIMUM_CAPACITY {
            return Err(ConfigError::InvalidCapacity {
                policy: allkeys_lru::POLICY_NAME,
                capacity,
                minimum: allkeys_lru::MINIMUM_CAPACITY,
            });
        }

        let store = AllKeysLruStore::new(capacity, options.passive_expiration);
        Ok(Self::start(store, interval, options.expire_strategy))
    }
}

impl<K, V> VolatileLruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Opens a cache that evicts the least recently used expiring key when
    /// full, falling back to plain LRU when no resident key expires.
    ///
    /// The capacity must be at least 2.
    pub fn open_volatile_lru(capacity: usize, options: Options) -> Result<Self, ConfigError> {
        let interval = options.validated_interval()?;
        let capacity = options.capacity.unwrap_or(capacity);
        if capacity < volatile_lru::MINIMUM_CAPACITY {
            return Err(ConfigError::InvalidCapacity {
                policy: volatile_lru::POLICY_NAME,
                capacity,
                minimum: volatile_lru::MINIMUM_CAPACITY,
            });
        }

        let store = VolatileLruStore::new(capacity, options.passive_expiration);
        Ok(Self::start(store, interval, options.expire_strategy))
    }
}

impl<K, V> AllKeysLfuCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Opens a cache that evicts the least frequently used key when full.
    ///
    /// The capacity must be at least 2.
    pub fn open_lfu(capacity: usize, options: Options) -> Result<Self, ConfigError> {
        let interval = options.validated_interval()?;
        let capacity = options.capacity.unwrap_or(capacity);
        if capacity < allkeys_lfu::MINIMUM_CAPACITY {
            return Err(ConfigError::InvalidCapacity {
                policy: allkeys_lfu::POLICY_NAME,
                capacity,
                minimum: allkeys_lfu::MINIMUM_CAPACITY,
            });
        }

        let store = AllKeysLfuStore::new(capacity, options.passive_expiration);
        Ok(Self::start(store, interval, options.expire_strategy))
    }
}

impl<K, V, S> Cache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: Store<K, V>,
{
    fn start(store: S, interval: Option<Duration>, strategy: ExpireStrategy) -> Self
    where
        K: Send + Sync + 'static,
        V: Send + Sync + 'static,
        S: 'static,
    {
        let store = Arc::new(store);
        let closer = Arc::new(Closer::new());

        let expirer = interval.map(|interval| {
            let store = Arc::clone(&store);
            let closer = Arc::clone(&closer);
            thread::spawn(move || {
                while !closer.wait_timeout(interval) {
                    strategy.expire(&*store);
                }
            })
        });

        Self {
            store,
            closer,
            expirer,
            _marker: PhantomData,
        }
    }

    /// Sets `key` to `value` without an expiry.
    pub fn set(&self, key: K, value: V) {
        self.store.set(key, Item::new(value));
    }

    /// Sets `key` to `value`, expiring `ttl` from now.
    pub fn set_ex(&self, key: K, value: V, ttl: Duration) {
        self.store.set(key, Item::expiring(value, ttl));
    }

    /// Returns the value for `key`, or `None` when absent or expired.
    ///
    /// Under passive expiration an expired hit is also deleted; otherwise
    /// the expired entry stays resident until an active sweep or an
    /// explicit delete.
    pub fn get(&self, key: &K) -> Option<V> {
        let item = self.store.get(key)?;
        if item.is_expired() {
            return None;
        }
        Some(item.into_value())
    }

    /// Returns the remaining time to live for `key`.
    ///
    /// `None` when the key is absent, `Some(None)` for a resident key
    /// without expiry, `Some(Some(d))` for an expiring key (`d` is zero
    /// once past expiry).
    pub fn ttl(&self, key: &K) -> Option<Option<Duration>> {
        self.store.ttl(key)
    }

    /// Deletes the given keys; missing keys are ignored.
    pub fn delete(&self, keys: &[K]) {
        self.store.delete(keys);
    }

    /// Returns the number of entries currently in the cache.
    pub fn size(&self) -> usize {
        self.store.len()
    }

    /// Returns a snapshot of all keys, in unspecified order.
    pub fn keys(&self) -> Vec<K> {
        self.store.keys()
    }

    /// Returns a uniformly random key, or `None` when the cache is empty.
    pub fn random_key(&self) -> Option<K> {
        self.store.random_key()
    }

    /// Deletes every entry.
    pub fn flush(&self) {
        self.store.flush();
    }

    /// Stops background expiration. Idempotent and safe to call from any
    /// thread; cache operations keep working afterwards.
    pub fn close(&self) {
        self.closer.close();
    }

    /// Returns `true` once [`Cache::close`] has been called.
    pub fn closed(&self) -> bool {
        self.closer.closed()
    }
}

impl<K, V, S> Drop for Cache<K, V, S> {
    fn drop(&mut self) {
        self.closer.close();
        if let Some(expirer) = self.expirer.take() {
            let _ = expirer.join();
        }
    }
}
