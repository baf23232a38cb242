//! Adaptive Replacement Cache (ARC) replacement engine.
//!
//! Balances recency against frequency by keeping four lists and a target size
//! `p` for the recency side, adjusted on every ghost hit.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                           ArcCore<K, V> Layout                              │
//! │                                                                             │
//! │   map: FxHashMap<K, Resident<V>>        Resident { list, id, value }        │
//! │                                                                             │
//! │   T1 (seen once)                         T2 (seen at least twice)           │
//! │   ┌─────────────────────────┐            ┌─────────────────────────┐        │
//! │   │ MRU               LRU   │            │ MRU               LRU   │        │
//! │   │  [k] ◄──► [k] ◄──► [k]  │            │  [k] ◄──► [k] ◄──► [k]  │        │
//! │   └───────────────────┬─────┘            └───────────────────┬─────┘        │
//! │             demote    │                            demote    │              │
//! │                       ▼                                      ▼              │
//! │   B1 (ghost keys from T1)                B2 (ghost keys from T2)            │
//! │   ┌─────────────────────────┐            ┌─────────────────────────┐        │
//! │   │  [k] ◄──► [k] ◄──► [k]  │            │  [k] ◄──► [k] ◄──► [k]  │        │
//! │   └─────────────────────────┘            └─────────────────────────┘        │
//! │                                                                             │
//! │   p: target |T1|, 0 ≤ p ≤ capacity                                          │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lists are arena-backed ([`IntrusiveList`]) and hold keys; values live in the
//! map next to the node handle, so moving a key between lists is an index
//! relink and a ghost is simply a key with no map entry.
//!
//! ## Transitions
//!
//! | Case | Key found in | Action                                                    |
//! |------|--------------|-----------------------------------------------------------|
//! | I    | T1 or T2     | move to T2 MRU                                            |
//! | II   | B1           | `p += max(1, |B2|/|B1|)`, REPLACE, B1 → T2 MRU            |
//! | III  | B2           | `p -= max(1, |B1|/|B2|)`, REPLACE, B2 → T2 MRU            |
//! | IV   | nowhere      | trim T1/B1 or ghosts, REPLACE, insert at T1 MRU           |
//!
//! REPLACE only runs against a full cache. It demotes the LRU of T1 into B1
//! when `|T1| > p`, or when `|T1| == p` and the access was a B2 ghost hit;
//! otherwise it demotes the LRU of T2 into B2.
//!
//! ## Invariants
//!
//! - `|T1| + |T2| ≤ c`
//! - `|T1| + |B1| ≤ c`
//! - `|T1| + |T2| + |B1| + |B2| ≤ 2c`
//! - a key is in at most one of T1, T2, B1, B2
//!
//! ## Example Usage
//!
//! ```
//! use arcache::policy::arc::ArcCore;
//! use arcache::traits::EvictionEngine;
//!
//! let mut engine = ArcCore::new(2);
//! engine.insert("a", 1);
//! engine.insert("b", 2);
//! assert_eq!(engine.get(&"a").copied(), Some(1)); // promoted to T2
//!
//! // "b" is the only T1 entry and |T1| > p, so it is demoted to B1.
//! let evicted = engine.insert("c", 3);
//! assert_eq!(evicted, Some(("b", 2)));
//! assert_eq!(engine.b1_len(), 1);
//! ```
//!
//! ## References
//!
//! - Megiddo & Modha, "ARC: A Self-Tuning, Low Overhead Replacement Cache",
//!   FAST 2003

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::{GhostList, IntrusiveList, SlotId};
use crate::traits::{Access, EvictionEngine};

/// Live list an entry resides in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ListKind {
    T1,
    T2,
}

/// Index record for a resident key.
#[derive(Debug)]
struct Resident<V> {
    list: ListKind,
    id: SlotId,
    value: V,
}

/// Adaptive Replacement Cache engine.
pub struct ArcCore<K, V> {
    map: FxHashMap<K, Resident<V>>,
    t1: IntrusiveList<K>,
    t2: IntrusiveList<K>,
    b1: GhostList<K>,
    b2: GhostList<K>,
    p: usize,
    capacity: usize,
}

impl<K, V> ArcCore<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates an engine holding at most `capacity` live entries.
    ///
    /// `p` starts at 0, so a cold cache first favours frequency until B1 ghost
    /// hits show that recency pays.
    pub fn new(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            t1: IntrusiveList::with_capacity(capacity),
            t2: IntrusiveList::with_capacity(capacity),
            b1: GhostList::new(capacity),
            b2: GhostList::new(capacity.saturating_mul(2)),
            p: 0,
            capacity,
        }
    }

    /// Current target size of T1.
    pub fn p_value(&self) -> usize {
        self.p
    }

    pub fn t1_len(&self) -> usize {
        self.t1.len()
    }

    pub fn t2_len(&self) -> usize {
        self.t2.len()
    }

    pub fn b1_len(&self) -> usize {
        self.b1.len()
    }

    pub fn b2_len(&self) -> usize {
        self.b2.len()
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.t1.len() + self.t2.len() >= self.capacity
    }

    #[inline]
    fn total_len(&self) -> usize {
        self.t1.len() + self.t2.len() + self.b1.len() + self.b2.len()
    }

    /// Case I: a resident key moves to the MRU end of T2.
    fn promote(&mut self, key: &K) -> Option<&mut Resident<V>> {
        let resident = self.map.get_mut(key)?;
        match resident.list {
            ListKind::T1 => {
                let key = self.t1.remove(resident.id)?;
                resident.id = self.t2.push_front(key);
                resident.list = ListKind::T2;
            },
            ListKind::T2 => {
                self.t2.move_to_front(resident.id);
            },
        }
        Some(resident)
    }

    fn attach(&mut self, key: K, value: V, list: ListKind) {
        let id = match list {
            ListKind::T1 => self.t1.push_front(key.clone()),
            ListKind::T2 => self.t2.push_front(key.clone()),
        };
        let previous = self.map.insert(key, Resident { list, id, value });
        debug_assert!(previous.is_none(), "key attached twice");
    }

    /// Moves the LRU of `list` into its ghost list and yields the live pair.
    fn demote_lru(&mut self, list: ListKind) -> Option<(K, V)> {
        let key = match list {
            ListKind::T1 => self.t1.pop_back()?,
            ListKind::T2 => self.t2.pop_back()?,
        };
        let resident = self.map.remove(&key);
        debug_assert!(resident.is_some(), "list key missing from index");
        match list {
            ListKind::T1 => self.b1.record(key.clone()),
            ListKind::T2 => self.b2.record(key.clone()),
        }
        resident.map(|r| (key, r.value))
    }

    /// Drops the LRU of T1 outright, without leaving a ghost.
    fn discard_t1_lru(&mut self) -> Option<(K, V)> {
        let key = self.t1.pop_back()?;
        let resident = self.map.remove(&key)?;
        Some((key, resident.value))
    }

    /// REPLACE: frees one live slot when the cache is full.
    fn replace(&mut self, b2_hit: bool) -> Option<(K, V)> {
        if !self.is_full() {
            return None;
        }
        let t1_len = self.t1.len();
        let from_t1 = t1_len >= 1 && (t1_len > self.p || (t1_len == self.p && b2_hit));
        if from_t1 || self.t2.is_empty() {
            self.demote_lru(ListKind::T1)
        } else {
            self.demote_lru(ListKind::T2)
        }
    }

    /// Case IV bookkeeping ahead of inserting a brand new key into T1.
    fn make_room_for_miss(&mut self) -> Option<(K, V)> {
        if self.t1.len() + self.b1.len() == self.capacity {
            if self.t1.len() < self.capacity {
                self.b1.pop_lru();
                self.replace(false)
            } else {
                self.discard_t1_lru()
            }
        } else {
            let total = self.total_len();
            if total < self.capacity {
                return None;
            }
            if total >= 2 * self.capacity && self.b2.pop_lru().is_none() {
                self.b1.pop_lru();
            }
            self.replace(false)
        }
    }

    #[cfg(any(test, debug_assertions))]
    /// Validates internal invariants; panics on violation.
    pub fn debug_validate_invariants(&self)
    where
        K: fmt::Debug,
    {
        let c = self.capacity;
        self.t1.debug_validate_invariants();
        self.t2.debug_validate_invariants();
        self.b1.debug_validate_invariants();
        self.b2.debug_validate_invariants();

        assert_eq!(
            self.map.len(),
            self.t1.len() + self.t2.len(),
            "index size must equal |T1| + |T2|"
        );
        assert!(self.t1.len() + self.t2.len() <= c, "|T1| + |T2| exceeds {c}");
        assert!(self.t1.len() + self.b1.len() <= c, "|T1| + |B1| exceeds {c}");
        assert!(self.total_len() <= 2 * c, "directory exceeds 2 * {c}");
        assert!(self.p <= c, "p ({}) exceeds capacity ({c})", self.p);

        for (key, resident) in &self.map {
            let list = match resident.list {
                ListKind::T1 => &self.t1,
                ListKind::T2 => &self.t2,
            };
            assert_eq!(list.get(resident.id), Some(key), "index points at wrong node");
            assert!(!self.b1.contains(key), "key {key:?} is live and in B1");
            assert!(!self.b2.contains(key), "key {key:?} is live and in B2");
        }
        for key in self.b1.iter() {
            assert!(!self.b2.contains(key), "key {key:?} is in both B1 and B2");
        }
    }
}

impl<K, V> EvictionEngine<K, V> for ArcCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn len(&self) -> usize {
        self.t1.len() + self.t2.len()
    }

    fn classify(&self, key: &K) -> Access {
        if self.map.contains_key(key) {
            Access::HitCached
        } else if self.b1.contains(key) {
            Access::HitGhostB1
        } else if self.b2.contains(key) {
            Access::HitGhostB2
        } else {
            Access::Miss
        }
    }

    fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|r| &r.value)
    }

    fn get(&mut self, key: &K) -> Option<&mut V> {
        self.promote(key).map(|r| &mut r.value)
    }

    fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.capacity == 0 {
            return None;
        }

        match self.classify(&key) {
            Access::HitCached => {
                if let Some(resident) = self.promote(&key) {
                    resident.value = value;
                }
                None
            },
            Access::HitGhostB1 => {
                let ratio = self.b2.len() / self.b1.len();
                self.p = (self.p + ratio.max(1)).min(self.capacity);
                let evicted = self.replace(false);
                self.b1.remove(&key);
                self.attach(key, value, ListKind::T2);
                evicted
            },
            Access::HitGhostB2 => {
                let ratio = self.b1.len() / self.b2.len();
                self.p = self.p.saturating_sub(ratio.max(1));
                let evicted = self.replace(true);
                self.b2.remove(&key);
                self.attach(key, value, ListKind::T2);
                evicted
            },
            Access::Miss => {
                let evicted = self.make_room_for_miss();
                self.attach(key, value, ListKind::T1);
                evicted
            },
        }
    }

    fn expire(&mut self, key: &K) -> Option<V> {
        let resident = self.map.remove(key)?;
        match resident.list {
            ListKind::T1 => {
                self.t1.remove(resident.id);
                self.b1.record(key.clone());
            },
            ListKind::T2 => {
                self.t2.remove(resident.id);
                self.b2.record(key.clone());
            },
        }
        Some(resident.value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        match self.map.remove(key) {
            Some(resident) => {
                match resident.list {
                    ListKind::T1 => self.t1.remove(resident.id),
                    ListKind::T2 => self.t2.remove(resident.id),
                };
                Some(resident.value)
            },
            None => {
                if !self.b1.remove(key) {
                    self.b2.remove(key);
                }
                None
            },
        }
    }

    fn drain(&mut self) -> Vec<(K, V)> {
        let mut drained = Vec::with_capacity(self.len());
        while let Some(key) = self.t1.pop_back() {
            if let Some(resident) = self.map.remove(&key) {
                drained.push((key, resident.value));
            }
        }
        while let Some(key) = self.t2.pop_back() {
            if let Some(resident) = self.map.remove(&key) {
                drained.push((key, resident.value));
            }
        }
        debug_assert!(self.map.is_empty(), "index outlived its lists");
        self.b1.clear();
        self.b2.clear();
        self.p = 0;
        drained
    }

    fn keys(&self) -> Vec<&K> {
        self.t1.iter().chain(self.t2.iter()).collect()
    }
}

impl<K, V> fmt::Debug for ArcCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcCore")
            .field("capacity", &self.capacity)
            .field("t1_len", &self.t1.len())
            .field("t2_len", &self.t2.len())
            .field("b1_len", &self.b1.len())
            .field("b2_len", &self.b2.len())
            .field("p", &self.p)
            .finish()
    }
}
