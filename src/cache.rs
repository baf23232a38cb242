//! Thread-safe loading cache.
//!
//! [`Cache`] wraps a replacement engine ([`ArcCore`] or [`LruCore`]) behind a
//! single `parking_lot::RwLock` and layers lazy expiration, deduplicated
//! loading, user callbacks and hit/miss statistics on top.
//!
//! ## Request Flow
//!
//! ```text
//!   get(k)
//!     │
//!     ▼
//!   write lock ──► peek k ──expired──► expire (ghost + evicted_func) ──┐
//!     │               │                                                │
//!     │             live                                              miss
//!     │               ▼                                                │
//!     │          engine.get (Case I) ──► touch deadline ──► Ok(value)  │
//!     ▼                                                                ▼
//!   unlock ◄───────────────────────────────────────────────────────────┘
//!     │
//!     ├── no loader ──► Err(NotFound)
//!     ▼
//!   LoadCoordinator::resolve(k)  (one producer call per key)
//!     │
//!     ▼
//!   write lock ──► engine.insert (Case II/III/IV) ──► evicted_func / added_func
//! ```
//!
//! ## Callbacks
//!
//! | Callback             | Fired when                                        |
//! |----------------------|---------------------------------------------------|
//! | `evicted_func`       | a live entry is displaced by an insert or expires |
//! | `purge_visitor_func` | once per live entry during [`Cache::purge`]       |
//! | `added_func`         | after every `set` and every committed load        |
//!
//! All callbacks run while the write lock is held and must not call back into
//! the same cache.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use arcache::builder::CacheBuilder;
//!
//! let cache = CacheBuilder::new(2)
//!     .arc()
//!     .loader(|key: &u32| Ok::<_, String>(format!("value-{key}")))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(*cache.get(&7).unwrap(), "value-7");
//! assert!(cache.has(&7));
//! assert_eq!(cache.len(false), 1);
//! ```

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::builder::CachePolicy;
use crate::clock::Clock;
use crate::entry::Entry;
use crate::error::CacheError;
use crate::expiry::ExpirationPolicy;
use crate::loader::LoadCoordinator;
use crate::policy::arc::ArcCore;
use crate::policy::lru::LruCore;
use crate::stats::{CacheStats, CacheStatsSnapshot};
use crate::traits::EvictionEngine;

/// Receives ownership of a removed key/value pair.
pub type EvictedFn<K, V> = Box<dyn Fn(K, Arc<V>) + Send + Sync>;

/// Observes a freshly stored key/value pair.
pub type AddedFn<K, V> = Box<dyn Fn(&K, &Arc<V>) + Send + Sync>;

pub(crate) type LoaderFn<K, V, E> = Box<dyn Fn(&K) -> Result<V, E> + Send + Sync>;

pub(crate) type ExpiringLoaderFn<K, V, E> =
    Box<dyn Fn(&K) -> Result<(V, Option<Duration>), E> + Send + Sync>;

/// Value producer consulted on a miss.
pub(crate) enum Loader<K, V, E> {
    Plain(LoaderFn<K, V, E>),
    WithExpiration(ExpiringLoaderFn<K, V, E>),
}

impl<K, V, E> Loader<K, V, E> {
    fn load(&self, key: &K) -> Result<(V, Option<Duration>), E> {
        match self {
            Loader::Plain(load) => load(key).map(|value| (value, None)),
            Loader::WithExpiration(load) => load(key),
        }
    }
}

pub(crate) struct Callbacks<K, V> {
    pub(crate) evicted: Option<EvictedFn<K, V>>,
    pub(crate) purge_visitor: Option<EvictedFn<K, V>>,
    pub(crate) added: Option<AddedFn<K, V>>,
}

impl<K, V> Default for Callbacks<K, V> {
    fn default() -> Self {
        Self {
            evicted: None,
            purge_visitor: None,
            added: None,
        }
    }
}

impl<K, V> Callbacks<K, V> {
    fn on_evicted(&self, key: K, value: Arc<V>) {
        if let Some(evicted) = &self.evicted {
            evicted(key, value);
        }
    }

    fn on_added(&self, key: &K, value: &Arc<V>) {
        if let Some(added) = &self.added {
            added(key, value);
        }
    }
}

/// Replacement engine selected at build time.
enum Engine<K, V> {
    Arc(ArcCore<K, Entry<V>>),
    Lru(LruCore<K, Entry<V>>),
}

impl<K, V> Engine<K, V>
where
    K: Clone + Eq + Hash,
{
    fn new(policy: CachePolicy, capacity: usize) -> Self {
        match policy {
            CachePolicy::Arc => Engine::Arc(ArcCore::new(capacity)),
            CachePolicy::Lru => Engine::Lru(LruCore::new(capacity)),
        }
    }

    fn policy(&self) -> CachePolicy {
        match self {
            Engine::Arc(_) => CachePolicy::Arc,
            Engine::Lru(_) => CachePolicy::Lru,
        }
    }

    fn as_dyn(&self) -> &dyn EvictionEngine<K, Entry<V>> {
        match self {
            Engine::Arc(arc) => arc,
            Engine::Lru(lru) => lru,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn EvictionEngine<K, Entry<V>> {
        match self {
            Engine::Arc(arc) => arc,
            Engine::Lru(lru) => lru,
        }
    }
}

/// Bounded, thread-safe cache with lazy expiration and deduplicated loading.
///
/// Built with [`CacheBuilder`](crate::builder::CacheBuilder). `E` is the
/// loader's error type; it defaults to [`Infallible`] for caches without a
/// loader.
pub struct Cache<K, V, E = Infallible> {
    engine: RwLock<Engine<K, V>>,
    expiry: ExpirationPolicy,
    clock: Arc<dyn Clock>,
    loader: Option<Loader<K, V, E>>,
    coordinator: LoadCoordinator<K, V, E>,
    callbacks: Callbacks<K, V>,
    stats: CacheStats,
}

impl<K, V, E> Cache<K, V, E>
where
    K: Clone + Eq + Hash,
    E: Clone,
{
    pub(crate) fn from_parts(
        policy: CachePolicy,
        capacity: usize,
        expiry: ExpirationPolicy,
        clock: Arc<dyn Clock>,
        loader: Option<Loader<K, V, E>>,
        callbacks: Callbacks<K, V>,
    ) -> Self {
        Self {
            engine: RwLock::new(Engine::new(policy, capacity)),
            expiry,
            clock,
            loader,
            coordinator: LoadCoordinator::new(),
            callbacks,
            stats: CacheStats::new(),
        }
    }

    /// Returns the value for `key`, loading it on a miss if a loader is
    /// configured.
    ///
    /// Concurrent misses on the same key share one loader call; every caller
    /// receives the same value or a clone of the same error.
    pub fn get(&self, key: &K) -> Result<Arc<V>, CacheError<E>> {
        self.get_with_deadline(key, None)
    }

    /// Like [`get`](Self::get), but stops waiting on another caller's
    /// in-flight load after `timeout` and returns [`CacheError::Timeout`].
    ///
    /// A caller that ends up running the loader itself is never timed out. A
    /// `timeout` too large to represent waits without a deadline.
    pub fn get_timeout(&self, key: &K, timeout: Duration) -> Result<Arc<V>, CacheError<E>> {
        self.get_with_deadline(key, Instant::now().checked_add(timeout))
    }

    /// Returns the value for `key` only if it is resident and live. Never
    /// invokes the loader.
    pub fn get_if_present(&self, key: &K) -> Result<Arc<V>, CacheError<E>> {
        match self.lookup(key) {
            Some(value) => {
                self.stats.record_hit();
                Ok(value)
            },
            None => {
                self.stats.record_miss();
                Err(CacheError::NotFound)
            },
        }
    }

    /// Stores `value` under `key` using the cache-wide TTL.
    pub fn set(&self, key: K, value: V) {
        self.commit(key, Arc::new(value), None);
    }

    /// Stores `value` under `key` with a TTL that overrides the cache-wide one.
    pub fn set_with_expire(&self, key: K, value: V, ttl: Duration) {
        self.commit(key, Arc::new(value), Some(ttl));
    }

    /// Whether `key` is resident and live.
    ///
    /// Does not count as an access: recency and statistics are untouched. A
    /// stale entry found here is expired on the spot.
    pub fn has(&self, key: &K) -> bool {
        let now = self.clock.now();
        let mut engine = self.engine.write();
        let engine = engine.as_dyn_mut();
        let expired = match engine.peek(key) {
            Some(entry) => self.expiry.is_expired(entry, now),
            None => return false,
        };
        if expired {
            self.expire_locked(engine, key);
        }
        !expired
    }

    /// Removes `key`, live or ghost. Returns whether a live entry was removed.
    ///
    /// A key known only to the ghost history is dropped from it, but the call
    /// still returns `false`. Explicit removal is not an eviction: no callback fires.
    pub fn remove(&self, key: &K) -> bool {
        self.engine.write().as_dyn_mut().remove(key).is_some()
    }

    /// Number of resident entries.
    ///
    /// With `exclude_expired`, stale entries are expired first so the count
    /// reflects live entries only.
    pub fn len(&self, exclude_expired: bool) -> usize {
        if !exclude_expired {
            return self.engine.read().as_dyn().len();
        }
        let now = self.clock.now();
        let mut engine = self.engine.write();
        let engine = engine.as_dyn_mut();
        self.sweep_locked(engine, now);
        engine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len(false) == 0
    }

    /// Resident keys, most recently used first within each internal list.
    pub fn keys(&self, exclude_expired: bool) -> Vec<K> {
        let now = self.clock.now();
        let mut engine = self.engine.write();
        let engine = engine.as_dyn_mut();
        if exclude_expired {
            self.sweep_locked(engine, now);
        }
        engine.keys().into_iter().cloned().collect()
    }

    /// Snapshot of resident entries.
    pub fn get_all(&self, exclude_expired: bool) -> HashMap<K, Arc<V>> {
        let now = self.clock.now();
        let mut engine = self.engine.write();
        let engine = engine.as_dyn_mut();
        if exclude_expired {
            self.sweep_locked(engine, now);
        }
        let engine: &dyn EvictionEngine<K, Entry<V>> = engine;
        engine
            .keys()
            .into_iter()
            .filter_map(|key| {
                engine
                    .peek(key)
                    .map(|entry| (key.clone(), Arc::clone(entry.value())))
            })
            .collect()
    }

    /// Drops every live entry, handing each to the purge visitor, and clears
    /// ghost history.
    pub fn purge(&self) {
        let mut engine = self.engine.write();
        let drained = engine.as_dyn_mut().drain();
        tracing::debug!(entries = drained.len(), "purging cache");
        if let Some(visit) = &self.callbacks.purge_visitor {
            for (key, entry) in drained {
                visit(key, entry.into_value());
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.engine.read().as_dyn().capacity()
    }

    /// Replacement strategy this cache was built with.
    pub fn policy(&self) -> CachePolicy {
        self.engine.read().policy()
    }

    /// Entries handed out from the cache without loading.
    pub fn hit_count(&self) -> u64 {
        self.stats.hit_count()
    }

    /// Lookups that found no live entry.
    pub fn miss_count(&self) -> u64 {
        self.stats.miss_count()
    }

    pub fn lookup_count(&self) -> u64 {
        self.stats.snapshot().lookup_count()
    }

    pub fn hit_rate(&self) -> f64 {
        self.stats.snapshot().hit_rate()
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    fn get_with_deadline(
        &self,
        key: &K,
        deadline: Option<Instant>,
    ) -> Result<Arc<V>, CacheError<E>> {
        if let Some(value) = self.lookup(key) {
            self.stats.record_hit();
            return Ok(value);
        }
        self.stats.record_miss();

        let Some(loader) = &self.loader else {
            return Err(CacheError::NotFound);
        };
        self.coordinator
            .resolve(key, deadline, || self.load_and_commit(loader, key))
    }

    /// Live value for `key`, recording the access with the engine.
    fn lookup(&self, key: &K) -> Option<Arc<V>> {
        let now = self.clock.now();
        let mut engine = self.engine.write();
        let engine = engine.as_dyn_mut();
        let expired = self.expiry.is_expired(engine.peek(key)?, now);
        if expired {
            self.expire_locked(engine, key);
            return None;
        }
        let entry = engine.get(key)?;
        self.expiry.touch(entry, now);
        Some(Arc::clone(entry.value()))
    }

    fn load_and_commit(&self, loader: &Loader<K, V, E>, key: &K) -> Result<Arc<V>, E> {
        // A previous leader may have committed between our miss and our turn.
        {
            let now = self.clock.now();
            let engine = self.engine.read();
            if let Some(entry) = engine.as_dyn().peek(key)
                && !self.expiry.is_expired(entry, now)
            {
                return Ok(Arc::clone(entry.value()));
            }
        }

        let (value, ttl) = loader.load(key)?;
        let value = Arc::new(value);
        self.commit(key.clone(), Arc::clone(&value), ttl);
        Ok(value)
    }

    fn commit(&self, key: K, value: Arc<V>, ttl: Option<Duration>) {
        let entry = Entry::new(Arc::clone(&value), self.expiry.ttl_for(ttl), self.clock.now());
        let mut engine = self.engine.write();
        if let Some((victim, old)) = engine.as_dyn_mut().insert(key.clone(), entry) {
            tracing::trace!("evicted entry to make room");
            self.callbacks.on_evicted(victim, old.into_value());
        }
        self.callbacks.on_added(&key, &value);
    }

    fn expire_locked(&self, engine: &mut dyn EvictionEngine<K, Entry<V>>, key: &K) {
        if let Some(entry) = engine.expire(key) {
            self.callbacks.on_evicted(key.clone(), entry.into_value());
        }
    }

    fn sweep_locked(&self, engine: &mut dyn EvictionEngine<K, Entry<V>>, now: Instant) {
        let view: &dyn EvictionEngine<K, Entry<V>> = engine;
        let stale: Vec<K> = view
            .keys()
            .into_iter()
            .filter(|key| {
                view.peek(key)
                    .is_some_and(|entry| self.expiry.is_expired(entry, now))
            })
            .cloned()
            .collect();
        if stale.is_empty() {
            return;
        }
        tracing::trace!(expired = stale.len(), "swept stale entries");
        for key in &stale {
            self.expire_locked(engine, key);
        }
    }
}

impl<K, V> Cache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Shorthand for [`CacheBuilder::new`](crate::builder::CacheBuilder::new).
    pub fn builder(capacity: usize) -> crate::builder::CacheBuilder<K, V> {
        crate::builder::CacheBuilder::new(capacity)
    }
}

impl<K, V, E> fmt::Debug for Cache<K, V, E>
where
    K: Clone + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let engine = self.engine.read();
        f.debug_struct("Cache")
            .field("policy", &engine.policy())
            .field("capacity", &engine.as_dyn().capacity())
            .field("len", &engine.as_dyn().len())
            .field("expiry", &self.expiry)
            .field("has_loader", &self.loader.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::builder::CacheBuilder;
    use crate::clock::ManualClock;
    use crate::expiry::ExpirationMode;

    fn counter() -> (Arc<AtomicUsize>, impl Fn(u32, Arc<String>) + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let hook = {
            let count = Arc::clone(&count);
            move |_: u32, _: Arc<String>| {
                count.fetch_add(1, Ordering::SeqCst);
            }
        };
        (count, hook)
    }

    #[test]
    fn get_without_loader_is_not_found() {
        let cache: Cache<u32, String> = CacheBuilder::new(4).build().unwrap();
        assert_eq!(cache.get(&1), Err(CacheError::NotFound));
        cache.set(1, "one".to_string());
        assert_eq!(*cache.get(&1).unwrap(), "one");
        assert_eq!(cache.hit_count(), 1);
        assert_eq!(cache.miss_count(), 1);
    }

    #[test]
    fn loader_result_is_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = {
            let calls = Arc::clone(&calls);
            CacheBuilder::new(4)
                .loader(move |key: &u32| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(key * 10)
                })
                .build()
                .unwrap()
        };

        assert_eq!(*cache.get(&3).unwrap(), 30);
        assert_eq!(*cache.get(&3).unwrap(), 30);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().lookup_count(), 2);
    }

    #[test]
    fn loader_error_is_not_cached() {
        let fail = Arc::new(std::sync::atomic::AtomicBool::new(true));
        let cache = {
            let fail = Arc::clone(&fail);
            CacheBuilder::new(4)
                .loader(move |key: &u32| {
                    if fail.load(Ordering::SeqCst) {
                        Err("backend down".to_string())
                    } else {
                        Ok(*key)
                    }
                })
                .build()
                .unwrap()
        };

        assert_eq!(cache.get(&1), Err(CacheError::Load("backend down".to_string())));
        assert!(!cache.has(&1));
        fail.store(false, Ordering::SeqCst);
        assert_eq!(*cache.get(&1).unwrap(), 1);
    }

    #[test]
    fn get_if_present_never_loads() {
        let cache = CacheBuilder::new(4)
            .loader(|_: &u32| -> Result<u32, String> { panic!("loader must not run") })
            .build()
            .unwrap();
        assert_eq!(cache.get_if_present(&1), Err(CacheError::NotFound));
        cache.set(1, 11);
        assert_eq!(*cache.get_if_present(&1).unwrap(), 11);
    }

    #[test]
    fn capacity_overflow_fires_one_eviction() {
        let (evictions, hook) = counter();
        let cache: Cache<u32, String> = CacheBuilder::new(3).evicted_func(hook).build().unwrap();
        for key in 0..4 {
            cache.set(key, key.to_string());
        }
        assert_eq!(evictions.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(false), 3);
    }

    #[test]
    fn remove_does_not_fire_eviction() {
        let (evictions, hook) = counter();
        let cache: Cache<u32, String> = CacheBuilder::new(3).evicted_func(hook).build().unwrap();
        cache.set(1, "a".to_string());
        assert!(cache.remove(&1));
        assert!(!cache.remove(&1));
        assert_eq!(evictions.load(Ordering::SeqCst), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn expired_entry_is_evicted_lazily() {
        let clock = Arc::new(ManualClock::new());
        let (evictions, hook) = counter();
        let cache: Cache<u32, String> = CacheBuilder::new(4)
            .expiration(Duration::from_millis(10))
            .clock(clock.clone())
            .evicted_func(hook)
            .build()
            .unwrap();

        cache.set(1, "a".to_string());
        cache.set(2, "b".to_string());
        clock.advance(Duration::from_millis(11));

        assert_eq!(cache.len(false), 2);
        assert!(!cache.has(&1));
        assert_eq!(evictions.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(true), 0);
        assert_eq!(evictions.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn refresh_on_access_extends_deadline() {
        let clock = Arc::new(ManualClock::new());
        let cache: Cache<u32, u32> = CacheBuilder::new(4)
            .expiration(Duration::from_millis(10))
            .expiration_mode(ExpirationMode::RefreshOnAccess)
            .clock(clock.clone())
            .build()
            .unwrap();

        cache.set(1, 1);
        clock.advance(Duration::from_millis(8));
        assert!(cache.get(&1).is_ok());
        clock.advance(Duration::from_millis(8));
        assert!(cache.get(&1).is_ok());
        clock.advance(Duration::from_millis(11));
        assert_eq!(cache.get(&1), Err(CacheError::NotFound));
    }

    #[test]
    fn set_with_expire_overrides_default_ttl() {
        let clock = Arc::new(ManualClock::new());
        let cache: Cache<u32, u32> = CacheBuilder::new(4)
            .expiration(Duration::from_secs(60))
            .clock(clock.clone())
            .build()
            .unwrap();

        cache.set_with_expire(1, 1, Duration::from_millis(5));
        cache.set(2, 2);
        clock.advance(Duration::from_millis(6));
        assert!(!cache.has(&1));
        assert!(cache.has(&2));
    }

    #[test]
    fn loader_with_expiration_sets_entry_ttl() {
        let clock = Arc::new(ManualClock::new());
        let cache = CacheBuilder::new(4)
            .loader_with_expiration(|key: &u32| {
                Ok::<_, String>((*key, Some(Duration::from_millis(5))))
            })
            .clock(clock.clone())
            .build()
            .unwrap();

        assert_eq!(*cache.get(&9).unwrap(), 9);
        clock.advance(Duration::from_millis(6));
        assert!(!cache.has(&9));
    }

    #[test]
    fn purge_visits_every_live_entry() {
        let (visits, hook) = counter();
        let cache: Cache<u32, String> = CacheBuilder::new(4)
            .purge_visitor_func(hook)
            .build()
            .unwrap();
        for key in 0..4 {
            cache.set(key, key.to_string());
        }
        cache.purge();
        assert_eq!(visits.load(Ordering::SeqCst), 4);
        assert_eq!(cache.len(false), 0);
    }

    #[test]
    fn added_func_sees_sets_and_loads() {
        let added = Arc::new(Mutex::new(Vec::new()));
        let cache = {
            let added = Arc::clone(&added);
            CacheBuilder::new(4)
                .loader(|key: &u32| Ok::<_, String>(*key))
                .added_func(move |key: &u32, _: &Arc<u32>| added.lock().unwrap().push(*key))
                .build()
                .unwrap()
        };
        cache.set(1, 1);
        cache.get(&2).unwrap();
        cache.get(&2).unwrap();
        assert_eq!(*added.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn keys_and_get_all_snapshot_residents() {
        let cache: Cache<u32, u32> = CacheBuilder::new(4).build().unwrap();
        cache.set(1, 10);
        cache.set(2, 20);
        cache.get(&1).unwrap();

        // T1 = [2], T2 = [1]
        assert_eq!(cache.keys(false), vec![2, 1]);
        let all = cache.get_all(false);
        assert_eq!(all.len(), 2);
        assert_eq!(*all[&1], 10);
    }

    #[test]
    fn lru_policy_is_selectable() {
        let cache: Cache<u32, u32> = CacheBuilder::new(2).lru().build().unwrap();
        assert_eq!(cache.policy(), CachePolicy::Lru);
        cache.set(1, 1);
        cache.set(2, 2);
        cache.get(&1).unwrap();
        cache.set(3, 3);
        assert!(cache.has(&1));
        assert!(!cache.has(&2));
    }

    #[test]
    fn debug_output_names_policy() {
        let cache: Cache<u32, u32> = CacheBuilder::new(2).build().unwrap();
        let debug = format!("{cache:?}");
        assert!(debug.contains("Arc"));
        assert!(debug.contains("capacity: 2"));
    }

    #[test]
    fn huge_ttls_never_expire() {
        let clock = Arc::new(ManualClock::new());
        let cache: Cache<u32, u32> = CacheBuilder::new(4)
            .expiration(Duration::MAX)
            .refresh_on_access(true)
            .clock(clock.clone())
            .build()
            .unwrap();

        cache.set(1, 1);
        cache.set_with_expire(2, 2, Duration::MAX);
        assert_eq!(*cache.get(&1).unwrap(), 1);
        clock.advance(Duration::from_secs(86_400));
        assert!(cache.has(&1));
        assert!(cache.has(&2));
        assert_eq!(cache.len(true), 2);
    }

    #[test]
    fn loader_may_return_huge_ttl() {
        let cache = CacheBuilder::new(4)
            .loader_with_expiration(|key: &u32| Ok::<_, String>((*key, Some(Duration::MAX))))
            .build()
            .unwrap();
        assert_eq!(*cache.get(&3).unwrap(), 3);
        assert!(cache.has(&3));
    }

    #[test]
    fn unbounded_timeout_waits_without_deadline() {
        let cache = CacheBuilder::new(4)
            .loader(|key: &u32| Ok::<_, String>(*key * 2))
            .build()
            .unwrap();
        assert_eq!(*cache.get_timeout(&4, Duration::MAX).unwrap(), 8);
        assert_eq!(*cache.get_timeout(&4, Duration::MAX).unwrap(), 8);
    }
}
