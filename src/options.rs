//! Optional cache properties, collected before construction.
//!
//! An [`Options`] value is handed to the `open_*` constructors on
//! [`Cache`](crate::cache::Cache), which validate the collected record
//! once. Combinators may be chained in any order; unset fields keep their
//! defaults.
//!
//! ```
//! use std::time::Duration;
//! use memstash::options::Options;
//!
//! let options = Options::new()
//!     .with_passive_expiration()
//!     .with_active_expiration(Duration::from_secs(1));
//! ```

use std::time::Duration;

use crate::error::ConfigError;
use crate::expire::ExpireStrategy;

/// Optional properties of a cache, validated by the `open_*` constructors.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub(crate) passive_expiration: bool,
    pub(crate) active_expiration: Option<Duration>,
    pub(crate) capacity: Option<usize>,
    pub(crate) expire_strategy: ExpireStrategy,
}

impl Options {
    /// Creates the default option set: no passive expiration, no active
    /// expiration, policy-default capacity, all-keys sweep strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deletes an expired key when a `get` finds it, turning the hit into
    /// a miss.
    ///
    /// Costs a write lock on reads that would otherwise only need a read
    /// lock.
    pub fn with_passive_expiration(mut self) -> Self {
        self.passive_expiration = true;
        self
    }

    /// Runs a background expiration pass every `interval`.
    ///
    /// The interval must be non-zero; `open_*` fails with
    /// [`ConfigError::InvalidInterval`] otherwise.
    pub fn with_active_expiration(mut self, interval: Duration) -> Self {
        self.active_expiration = Some(interval);
        self
    }

    /// Sets the maximum number of keys the cache may hold.
    ///
    /// Intended for the no-eviction policy, whose constructor takes no
    /// capacity argument; on the other policies it overrides the
    /// positional capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Selects how the background expirer finds expired keys.
    ///
    /// Only meaningful together with [`Options::with_active_expiration`].
    pub fn with_expire_strategy(mut self, strategy: ExpireStrategy) -> Self {
        self.expire_strategy = strategy;
        self
    }

    pub(crate) fn validated_interval(&self) -> Result<Option<Duration>, ConfigError> {
        match self.active_expiration {
            Some(interval) if interval.is_zero() => Err(ConfigError::InvalidInterval),
            other => Ok(other),
        }
    }
}
