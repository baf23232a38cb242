//! Lazy expiration policy.
//!
//! There is no background sweeper. Staleness is decided inline whenever an
//! entry is looked up, using the deadline stored on the [`Entry`] and the
//! cache's [`Clock`](crate::clock::Clock).
//!
//! | Mode              | Deadline set on        | Read refreshes deadline |
//! |-------------------|------------------------|-------------------------|
//! | `Fixed`           | insert                 | no                      |
//! | `RefreshOnAccess` | insert                 | yes (sliding TTL)       |

use std::time::{Duration, Instant};

use crate::entry::{Entry, deadline_after};

/// Whether reads push an entry's deadline forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpirationMode {
    /// TTL counts from insertion; reads never extend it.
    #[default]
    Fixed,
    /// Every successful read restarts the entry's TTL.
    RefreshOnAccess,
}

/// Cache-wide TTL plus refresh mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpirationPolicy {
    ttl: Option<Duration>,
    mode: ExpirationMode,
}

impl ExpirationPolicy {
    pub fn new(ttl: Option<Duration>, mode: ExpirationMode) -> Self {
        Self { ttl, mode }
    }

    /// Entries never expire unless given a per-entry TTL.
    pub fn never() -> Self {
        Self::default()
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn mode(&self) -> ExpirationMode {
        self.mode
    }

    /// TTL for a new entry; a per-entry override wins over the cache-wide TTL.
    pub fn ttl_for(&self, override_ttl: Option<Duration>) -> Option<Duration> {
        override_ttl.or(self.ttl)
    }

    /// An entry is stale once its deadline lies strictly before `now`.
    #[inline]
    pub fn is_expired<V>(&self, entry: &Entry<V>, now: Instant) -> bool {
        entry.expires_at().is_some_and(|deadline| deadline < now)
    }

    /// Refreshes the deadline of a live entry after a read.
    pub fn touch<V>(&self, entry: &mut Entry<V>, now: Instant) {
        if self.mode == ExpirationMode::RefreshOnAccess
            && let Some(ttl) = entry.ttl()
        {
            entry.set_expires_at(deadline_after(now, Some(ttl)));
        }
    }
}
