//! Stored entry: shared value plus optional expiration deadline.

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Value record held by a replacement engine for every resident key.
///
/// Values are stored as `Arc<V>` so hits and fanned-out loads hand out cheap
/// clones instead of copying the payload.
#[derive(Debug)]
pub struct Entry<V> {
    value: Arc<V>,
    ttl: Option<Duration>,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    /// Builds an entry whose deadline is `now + ttl` when a TTL applies.
    ///
    /// A TTL too large to represent as an `Instant` leaves the entry without
    /// a deadline.
    pub fn new(value: Arc<V>, ttl: Option<Duration>, now: Instant) -> Self {
        Self {
            value,
            ttl,
            expires_at: deadline_after(now, ttl),
        }
    }

    pub fn value(&self) -> &Arc<V> {
        &self.value
    }

    pub fn into_value(self) -> Arc<V> {
        self.value
    }

    /// TTL this entry was created with.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    pub(crate) fn set_expires_at(&mut self, deadline: Option<Instant>) {
        self.expires_at = deadline;
    }
}

/// `now + ttl`, or `None` when there is no TTL or the sum overflows.
pub(crate) fn deadline_after(now: Instant, ttl: Option<Duration>) -> Option<Instant> {
    ttl.and_then(|ttl| now.checked_add(ttl))
}
