//! Error types for the memstash library.
//!
//! Construction is the only fallible surface: opening a cache with an
//! invalid active-expiration interval or a capacity below the policy's
//! minimum returns a [`ConfigError`]. Runtime operations (get/set/delete/
//! flush on missing or expired keys, double close) never fail visibly.
//!
//! ## Example Usage
//!
//! ```
//! use memstash::cache::Cache;
//! use memstash::error::ConfigError;
//! use memstash::options::Options;
//!
//! let err = Cache::<u64, u64, _>::open_lru(1, Options::new()).unwrap_err();
//! assert!(matches!(err, ConfigError::InvalidCapacity { .. }));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by the fallible `open_*` constructors on
/// [`Cache`](crate::cache::Cache). Runtime cache operations do not
/// return errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An active-expiration interval of zero was supplied.
    ///
    /// Intervals are [`std::time::Duration`]s and therefore cannot be
    /// negative; zero is the one invalid value.
    InvalidInterval,

    /// The requested capacity is below the policy's minimum.
    InvalidCapacity {
        /// Label of the policy that rejected the capacity.
        policy: &'static str,
        /// The capacity that was requested.
        capacity: usize,
        /// The smallest capacity the policy accepts.
        minimum: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidInterval => {
                f.write_str("provided interval must be greater than 0")
            },
            ConfigError::InvalidCapacity {
                policy,
                capacity,
                minimum,
            } => {
                write!(
                    f,
                    "capacity {capacity} must be at least {minimum} for {policy} caches"
                )
            },
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
