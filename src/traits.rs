//! # Replacement Engine Trait
//!
//! Every eviction strategy plugs into the [`Cache`](crate::cache::Cache)
//! frontend through [`EvictionEngine`]. The frontend owns locking, expiration,
//! loading and callbacks; an engine only decides list membership.
//!
//! ```text
//!                  ┌─────────────────────────────────────────┐
//!                  │        EvictionEngine<K, V>             │
//!                  │                                         │
//!                  │  classify(&K) → Access                  │
//!                  │  get(&mut, &K) → Option<&mut V>         │
//!                  │  insert(&mut, K, V) → Option<(K, V)>    │
//!                  │  expire(&mut, &K) → Option<V>           │
//!                  │  remove(&mut, &K) → Option<V>           │
//!                  │  drain(&mut) → Vec<(K, V)>              │
//!                  └──────────────────┬──────────────────────┘
//!                                     │
//!                  ┌──────────────────┴──────────────────┐
//!                  ▼                                     ▼
//!       ┌─────────────────────┐               ┌─────────────────────┐
//!       │  ArcCore (T1 T2     │               │  LruCore (single    │
//!       │  B1 B2, adaptive p) │               │  recency list)      │
//!       └─────────────────────┘               └─────────────────────┘
//! ```
//!
//! ## Removal Kinds
//!
//! | Method   | Fires eviction callback | Leaves ghost (ARC) |
//! |----------|-------------------------|--------------------|
//! | `insert` | for the returned victim | yes                |
//! | `expire` | yes                     | yes                |
//! | `remove` | no                      | no (drops ghost)   |
//! | `drain`  | purge visitor instead   | no                 |

/// Where a key currently lives, as seen by an engine before an access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Resident with a live value.
    HitCached,
    /// Ghost in ARC's recency-side history (B1).
    HitGhostB1,
    /// Ghost in ARC's frequency-side history (B2).
    HitGhostB2,
    /// Unknown to the engine.
    Miss,
}

/// A bounded replacement engine.
///
/// Engines are single-threaded; the frontend serializes every call behind
/// one lock, so an implementation never sees two transitions interleave.
pub trait EvictionEngine<K, V> {
    /// Maximum number of resident entries.
    fn capacity(&self) -> usize;

    /// Number of resident entries (ghosts excluded).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Classifies `key` without changing any state.
    fn classify(&self, key: &K) -> Access;

    /// Resident value without touching recency.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Records a hit on a resident key and returns its value.
    fn get(&mut self, key: &K) -> Option<&mut V>;

    /// Inserts or replaces `key`, returning the live entry displaced to make
    /// room, if any.
    fn insert(&mut self, key: K, value: V) -> Option<(K, V)>;

    /// Drops a stale resident entry as if it had been evicted.
    fn expire(&mut self, key: &K) -> Option<V>;

    /// Explicit removal: forgets `key` entirely, including any ghost.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes every resident entry and resets adaptive state.
    fn drain(&mut self) -> Vec<(K, V)>;

    /// Resident keys, most recently used first within each internal list.
    fn keys(&self) -> Vec<&K>;
}
