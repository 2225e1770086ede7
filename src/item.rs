//! Cached record: a value plus an optional absolute expiry instant.
//!
//! An [`Item`] is immutable once stored; replacing a value is a new `set`,
//! never an in-place mutation. Expiry is tracked against the monotonic
//! clock ([`Instant`]), so system clock adjustments neither expire nor
//! resurrect entries.
//!
//! Values are stored by move. A value type with interior mutability (or one
//! that holds shared references) remains externally mutable after insertion;
//! keeping such values consistent is the caller's responsibility.

use std::time::{Duration, Instant};

/// A cached value together with its optional expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item<V> {
    value: V,
    expire_at: Option<Instant>,
}

impl<V> Item<V> {
    /// Creates an item that never expires.
    pub fn new(value: V) -> Self {
        Self {
            value,
            expire_at: None,
        }
    }

    /// Creates an item that expires `ttl` from now.
    pub fn expiring(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expire_at: Some(Instant::now() + ttl),
        }
    }

    /// Creates an item with an explicit expiry instant.
    pub fn expiring_at(value: V, expire_at: Instant) -> Self {
        Self {
            value,
            expire_at: Some(expire_at),
        }
    }

    /// Returns a reference to the cached value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the item and returns the cached value.
    pub fn into_value(self) -> V {
        self.value
    }

    /// Returns the expiry instant, or `None` for a non-expiring item.
    pub fn expire_at(&self) -> Option<Instant> {
        self.expire_at
    }

    /// Returns `true` if the item carries an expiry (a "volatile" item).
    pub fn is_volatile(&self) -> bool {
        self.expire_at.is_some()
    }

    /// Returns `true` if the item's expiry instant has passed.
    ///
    /// Non-expiring items are never expired. The comparison is strict: an
    /// item is not expired at the exact instant of its expiry.
    pub fn is_expired(&self) -> bool {
        match self.expire_at {
            None => false,
            Some(at) => Instant::now() > at,
        }
    }

    /// Returns the remaining time to live.
    ///
    /// `None` means the item never expires. An expired item reports
    /// `Some(Duration::ZERO)`; otherwise the positive remaining duration.
    pub fn ttl(&self) -> Option<Duration> {
        self.expire_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_expiring_item_never_expires() {
        let item = Item::new("a");
        assert!(!item.is_expired());
        assert!(!item.is_volatile());
        assert_eq!(item.ttl(), None);
    }

    #[test]
    fn expiring_item_reports_remaining_ttl() {
        let item = Item::expiring("a", Duration::from_secs(120));
        assert!(!item.is_expired());
        assert!(item.is_volatile());

        let ttl = item.ttl().unwrap();
        assert!(ttl > Duration::from_secs(60));
        assert!(ttl <= Duration::from_secs(120));
    }

    #[test]
    fn past_expiry_is_expired_with_zero_ttl() {
        let item = Item::expiring_at("a", Instant::now() - Duration::from_secs(1));
        assert!(item.is_expired());
        assert_eq!(item.ttl(), Some(Duration::ZERO));
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let item = Item::expiring("a", Duration::ZERO);
        std::thread::sleep(Duration::from_millis(1));
        assert!(item.is_expired());
        assert_eq!(item.ttl(), Some(Duration::ZERO));
    }

    #[test]
    fn value_accessors() {
        let item = Item::new(42);
        assert_eq!(*item.value(), 42);
        assert_eq!(item.into_value(), 42);
    }

    #[test]
    fn clone_preserves_expiry() {
        let item = Item::expiring(1, Duration::from_secs(60));
        let copy = item.clone();
        assert_eq!(item.expire_at(), copy.expire_at());
    }
}
