//! Active expiration strategies.
//!
//! A strategy is ticked by the cache's background expirer and removes
//! expired entries through the store's public contract. Each `ttl`,
//! `delete`, or `random_key` call takes the store lock individually, so a
//! sweep never holds the lock across the whole scan and user operations
//! interleave freely with it.

use std::hash::Hash;

use crate::store::Store;

/// Sample size used by [`ExpireStrategy::RandomSample`] when the configured
/// value is zero.
pub const DEFAULT_SAMPLE_SIZE: usize = 20;

/// Expired fraction above which [`ExpireStrategy::RandomSample`] runs
/// another round, used when the configured value is not positive.
pub const DEFAULT_EXPIRE_PERCENT: f64 = 0.25;

/// How the background expirer finds expired keys.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpireStrategy {
    /// Visit every key and delete those whose TTL has run out.
    ///
    /// One full pass per tick; cost grows with the key count.
    AllKeysScan,

    /// Draw random keys and delete the expired ones, repeating the round
    /// while the expired fraction stays above `expire_percent`.
    ///
    /// Bounded per-tick cost on large caches at the price of leaving a
    /// fraction of expired keys resident between ticks. Zero or negative
    /// parameters fall back to [`DEFAULT_SAMPLE_SIZE`] and
    /// [`DEFAULT_EXPIRE_PERCENT`] at invocation time.
    RandomSample {
        sample_size: usize,
        expire_percent: f64,
    },
}

impl Default for ExpireStrategy {
    fn default() -> Self {
        ExpireStrategy::AllKeysScan
    }
}

impl ExpireStrategy {
    /// Runs one expiration pass against `store`.
    pub fn expire<K, V, S>(&self, store: &S)
    where
        K: Eq + Hash + Clone,
        V: Clone,
        S: Store<K, V>,
    {
        match self {
            ExpireStrategy::AllKeysScan => all_keys_scan(store),
            ExpireStrategy::RandomSample {
                sample_size,
                expire_percent,
            } => random_sample(store, *sample_size, *expire_percent),
        }
    }
}

fn all_keys_scan<K, V, S>(store: &S)
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: Store<K, V>,
{
    for key in store.keys() {
        if let Some(Some(ttl)) = store.ttl(&key)
            && ttl.is_zero()
        {
            store.delete(std::slice::from_ref(&key));
        }
    }
}

fn random_sample<K, V, S>(store: &S, sample_size: usize, expire_percent: f64)
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: Store<K, V>,
{
    let sample_size = if sample_size == 0 {
        DEFAULT_SAMPLE_SIZE
    } else {
        sample_size
    };
    let expire_percent = if expire_percent <= 0.0 {
        DEFAULT_EXPIRE_PERCENT
    } else {
        expire_percent
    };

    loop {
        if store.len() == 0 {
            return;
        }

        let mut expired = 0usize;
        for _ in 0..sample_size {
            let Some(key) = store.random_key() else {
                return;
            };
            if let Some(Some(ttl)) = store.ttl(&key)
                && ttl.is_zero()
            {
                store.delete(std::slice::from_ref(&key));
                expired += 1;
            }
        }

        if expired as f64 / sample_size as f64 <= expire_percent {
            return;
        }
    }
}
