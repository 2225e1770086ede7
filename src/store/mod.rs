//! Store contract and the four policy implementations.
//!
//! A store is the policy-driven heart of a cache: the primary key→item map
//! plus whatever auxiliary indices the eviction policy needs, all guarded
//! by a single `parking_lot::RwLock`. The [`Store`] trait is the seam the
//! [`Cache`](crate::cache::Cache) façade and the expiration strategies
//! program against.
//!
//! | Implementation | Eviction | Auxiliary indices |
//! |---|---|---|
//! | [`NoEvictionStore`] | refuses new keys when full | random index |
//! | [`AllKeysLruStore`] | least recently used | random index, recency list |
//! | [`VolatileLruStore`] | LRU among expiring keys, plain LRU fallback | random index, recency list |
//! | [`AllKeysLfuStore`] | least frequently used, FIFO tie-break | random index, frequency ladder |
//!
//! Mutating operations take the lock in exclusive mode; `len`, `keys`,
//! `items`, `random_key`, and `ttl` take it shared. `get` needs exclusive
//! mode whenever it has policy side effects (recency promotion, frequency
//! bump) or may passively delete an expired hit.

pub mod allkeys_lfu;
pub mod allkeys_lru;
pub mod no_eviction;
pub mod volatile_lru;

use std::hash::Hash;
use std::time::Duration;

use parking_lot::MappedRwLockReadGuard;
use rustc_hash::FxHashMap;

pub use allkeys_lfu::AllKeysLfuStore;
pub use allkeys_lru::AllKeysLruStore;
pub use no_eviction::NoEvictionStore;
pub use volatile_lru::VolatileLruStore;

use crate::item::Item;

/// Operations every policy store provides.
///
/// Runtime operations never fail: deleting or reading absent keys and
/// flushing an empty store are silent no-ops. Construction-time validation
/// happens in the cache constructors, not here.
pub trait Store<K, V>: Send + Sync
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Inserts or replaces `key`, updating every index. May evict exactly
    /// one resident key when inserting a new key into a full store.
    fn set(&self, key: K, item: Item<V>);

    /// Looks up `key`, applying the policy's access side effects.
    ///
    /// Under passive expiration an expired hit is deleted and reported as a
    /// miss; otherwise the expired item is returned and the caller decides.
    fn get(&self, key: &K) -> Option<Item<V>>;

    /// Removes each present key from every index. Missing keys are ignored.
    fn delete(&self, keys: &[K]);

    /// Returns the number of resident entries.
    fn len(&self) -> usize;

    /// Returns a snapshot of all resident keys, in unspecified order.
    fn keys(&self) -> Vec<K>;

    /// Returns a uniformly random resident key, or `None` when empty.
    fn random_key(&self) -> Option<K>;

    /// Returns the remaining time to live for `key`.
    ///
    /// `None` when the key is absent; `Some(None)` for a resident
    /// non-expiring key; `Some(Some(d))` for a resident expiring key, with
    /// `d` clamped to zero once past expiry. No access side effects.
    fn ttl(&self, key: &K) -> Option<Option<Duration>>;

    /// Borrows the primary map while holding the store's read lock.
    ///
    /// The lock is released when the returned guard drops, on every exit
    /// path. Mutating store operations deadlock while the guard is alive.
    fn items(&self) -> MappedRwLockReadGuard<'_, FxHashMap<K, Item<V>>>;

    /// Empties every index.
    fn flush(&self);
}
