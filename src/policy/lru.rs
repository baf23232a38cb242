//! # Least Recently Used (LRU) Replacement Engine
//!
//! Sibling strategy to [`ArcCore`](crate::policy::arc::ArcCore): one recency
//! list, no ghosts, no adaptation. Useful as a baseline and for workloads
//! with plain temporal locality.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         LruCore<K, V>                                │
//!   │                                                                      │
//!   │   map: FxHashMap<K, Slot<V>>         Slot { id, value }              │
//!   │                                                                      │
//!   │   list: IntrusiveList<K> (recency order)                             │
//!   │   head ──► [k] ◄──► [k] ◄──► [k] ◄── tail                            │
//!   │   (MRU)                            (LRU, next victim)                │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation | Time | Notes                                  |
//! |-----------|------|----------------------------------------|
//! | `get`     | O(1) | moves key to MRU                       |
//! | `insert`  | O(1) | evicts the LRU when full               |
//! | `expire`  | O(1) | same as `remove` (no ghost history)    |
//! | `drain`   | O(n) | LRU first                              |
//!
//! ## Example Usage
//!
//! ```
//! use arcache::policy::lru::LruCore;
//! use arcache::traits::EvictionEngine;
//!
//! let mut engine = LruCore::new(2);
//! engine.insert(1, "one");
//! engine.insert(2, "two");
//! engine.get(&1);
//! assert_eq!(engine.insert(3, "three"), Some((2, "two")));
//! ```

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::{IntrusiveList, SlotId};
use crate::traits::{Access, EvictionEngine};

#[derive(Debug)]
struct Slot<V> {
    id: SlotId,
    value: V,
}

/// Least-recently-used engine.
pub struct LruCore<K, V> {
    map: FxHashMap<K, Slot<V>>,
    list: IntrusiveList<K>,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates an engine holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: IntrusiveList::with_capacity(capacity),
            capacity,
        }
    }

    /// Least recently used key, the next eviction victim.
    pub fn peek_lru(&self) -> Option<&K> {
        self.list.back()
    }

    fn detach(&mut self, key: &K) -> Option<V> {
        let slot = self.map.remove(key)?;
        self.list.remove(slot.id);
        Some(slot.value)
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();
        assert_eq!(self.map.len(), self.list.len());
        assert!(self.map.len() <= self.capacity);
        for (key, slot) in &self.map {
            assert!(self.list.get(slot.id) == Some(key), "index points at wrong node");
        }
    }
}

impl<K, V> EvictionEngine<K, V> for LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn classify(&self, key: &K) -> Access {
        if self.map.contains_key(key) {
            Access::HitCached
        } else {
            Access::Miss
        }
    }

    fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|slot| &slot.value)
    }

    fn get(&mut self, key: &K) -> Option<&mut V> {
        let slot = self.map.get_mut(key)?;
        self.list.move_to_front(slot.id);
        Some(&mut slot.value)
    }

    fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(slot) = self.map.get_mut(&key) {
            slot.value = value;
            self.list.move_to_front(slot.id);
            return None;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.list
                .pop_back()
                .and_then(|victim| self.map.remove(&victim).map(|slot| (victim, slot.value)))
        } else {
            None
        };

        let id = self.list.push_front(key.clone());
        self.map.insert(key, Slot { id, value });
        evicted
    }

    fn expire(&mut self, key: &K) -> Option<V> {
        self.detach(key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.detach(key)
    }

    fn drain(&mut self) -> Vec<(K, V)> {
        let mut drained = Vec::with_capacity(self.map.len());
        while let Some(key) = self.list.pop_back() {
            if let Some(slot) = self.map.remove(&key) {
                drained.push((key, slot.value));
            }
        }
        drained
    }

    fn keys(&self) -> Vec<&K> {
        self.list.iter().collect()
    }
}

impl<K, V> fmt::Debug for LruCore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.map.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lru_evicts_least_recent() {
        let mut engine = LruCore::new(3);
        engine.insert(1, 10);
        engine.insert(2, 20);
        engine.insert(3, 30);
        engine.get(&1);

        assert_eq!(engine.peek_lru(), Some(&2));
        assert_eq!(engine.insert(4, 40), Some((2, 20)));
        assert_eq!(engine.classify(&2), Access::Miss);
        assert_eq!(engine.keys(), vec![&4, &1, &3]);
        engine.debug_validate_invariants();
    }

    #[test]
    fn lru_update_moves_to_front_without_eviction() {
        let mut engine = LruCore::new(2);
        engine.insert("a", 1);
        engine.insert("b", 2);
        assert_eq!(engine.insert("a", 3), None);
        assert_eq!(engine.peek(&"a"), Some(&3));
        assert_eq!(engine.insert("c", 4), Some(("b", 2)));
        engine.debug_validate_invariants();
    }

    #[test]
    fn lru_remove_and_expire_forget_key() {
        let mut engine = LruCore::new(2);
        engine.insert("a", 1);
        engine.insert("b", 2);
        assert_eq!(engine.remove(&"a"), Some(1));
        assert_eq!(engine.expire(&"b"), Some(2));
        assert_eq!(engine.remove(&"a"), None);
        assert!(engine.is_empty());
        engine.debug_validate_invariants();
    }

    #[test]
    fn lru_drain_is_lru_first() {
        let mut engine = LruCore::new(3);
        engine.insert(1, ());
        engine.insert(2, ());
        engine.insert(3, ());
        let keys: Vec<_> = engine.drain().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![1, 2, 3]);
        assert!(engine.is_empty());
    }

    #[test]
    fn lru_zero_capacity_holds_nothing() {
        let mut engine = LruCore::new(0);
        assert_eq!(engine.insert(1, 1), None);
        assert!(engine.is_empty());
    }
}
