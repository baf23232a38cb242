//! Deduplicated on-miss loading.
//!
//! When several callers miss on the same key at once, exactly one of them (the
//! leader) runs the producer; the rest park on the key's [`PendingLoad`] and
//! are released with a clone of the leader's result.
//!
//! ```text
//!   caller A ──miss──► join(k) ──► Leader ──► producer(k) ──► commit ──┐
//!   caller B ──miss──► join(k) ──► Waiter ──┐                          │
//!   caller C ──miss──► join(k) ──► Waiter ──┤◄─── notify_all(result) ──┘
//!                                           ▼
//!                               same Ok(value) / Err(e)
//! ```
//!
//! - Failures are fanned out but never cached; the next caller after
//!   resolution starts a fresh load.
//! - A waiter with a deadline may give up; the leader keeps going and later
//!   waiters still get the result.
//! - If the leader unwinds (producer panic), the record is marked abandoned
//!   and waiters retry as fresh callers.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Condvar, Mutex};
use rustc_hash::FxHashMap;

use crate::error::CacheError;

/// Resolution state of one in-flight load.
enum Outcome<V, E> {
    Pending,
    Ready(Result<Arc<V>, E>),
    Abandoned,
}

/// One-shot completion signal shared by the leader and its waiters.
struct PendingLoad<V, E> {
    outcome: Mutex<Outcome<V, E>>,
    ready: Condvar,
}

enum Wait<V, E> {
    Done(Result<Arc<V>, E>),
    Abandoned,
    TimedOut,
}

impl<V, E: Clone> PendingLoad<V, E> {
    fn new() -> Self {
        Self {
            outcome: Mutex::new(Outcome::Pending),
            ready: Condvar::new(),
        }
    }

    fn publish(&self, outcome: Outcome<V, E>) {
        let mut slot = self.outcome.lock();
        debug_assert!(matches!(*slot, Outcome::Pending), "load resolved twice");
        *slot = outcome;
        self.ready.notify_all();
    }

    fn wait(&self, deadline: Option<Instant>) -> Wait<V, E> {
        let mut outcome = self.outcome.lock();
        loop {
            match &*outcome {
                Outcome::Ready(result) => return Wait::Done(result.clone()),
                Outcome::Abandoned => return Wait::Abandoned,
                Outcome::Pending => {},
            }
            match deadline {
                Some(deadline) => {
                    let timed_out = self.ready.wait_until(&mut outcome, deadline).timed_out();
                    if timed_out && matches!(*outcome, Outcome::Pending) {
                        return Wait::TimedOut;
                    }
                },
                None => self.ready.wait(&mut outcome),
            }
        }
    }
}

/// Registry of in-flight loads, keyed by cache key.
pub struct LoadCoordinator<K, V, E> {
    pending: Mutex<FxHashMap<K, Arc<PendingLoad<V, E>>>>,
}

impl<K, V, E> LoadCoordinator<K, V, E>
where
    K: Clone + Eq + Hash,
    E: Clone,
{
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(FxHashMap::default()),
        }
    }

    /// Number of keys with a load currently in flight.
    pub fn in_flight(&self) -> usize {
        self.pending.lock().len()
    }

    /// Resolves `key` through `load`, running it only if no other caller is
    /// already loading the same key.
    ///
    /// `load` is expected to commit its result to the cache before returning;
    /// waiters are released only after it has. With a `deadline`, a waiter
    /// returns [`CacheError::Timeout`] once it passes; the leader never does.
    pub fn resolve<F>(
        &self,
        key: &K,
        deadline: Option<Instant>,
        load: F,
    ) -> Result<Arc<V>, CacheError<E>>
    where
        F: FnOnce() -> Result<Arc<V>, E>,
    {
        loop {
            match self.join(key) {
                Role::Leader(guard) => return guard.run(load),
                Role::Waiter(pending) => match pending.wait(deadline) {
                    Wait::Done(result) => return result.map_err(CacheError::Load),
                    Wait::TimedOut => {
                        tracing::debug!("gave up waiting on in-flight load");
                        return Err(CacheError::Timeout);
                    },
                    Wait::Abandoned => continue,
                },
            }
        }
    }

    fn join(&self, key: &K) -> Role<'_, K, V, E> {
        let mut table = self.pending.lock();
        if let Some(pending) = table.get(key) {
            return Role::Waiter(Arc::clone(pending));
        }
        let pending = Arc::new(PendingLoad::new());
        table.insert(key.clone(), Arc::clone(&pending));
        Role::Leader(LeaderGuard {
            coordinator: self,
            key: key.clone(),
            pending,
            finished: false,
        })
    }

    fn unregister(&self, key: &K, pending: &Arc<PendingLoad<V, E>>) {
        let mut table = self.pending.lock();
        if table.get(key).is_some_and(|current| Arc::ptr_eq(current, pending)) {
            table.remove(key);
        }
    }
}

impl<K, V, E> Default for LoadCoordinator<K, V, E>
where
    K: Clone + Eq + Hash,
    E: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

enum Role<'a, K, V, E>
where
    K: Clone + Eq + Hash,
    E: Clone,
{
    Leader(LeaderGuard<'a, K, V, E>),
    Waiter(Arc<PendingLoad<V, E>>),
}

/// Held by the caller running the producer; resolves the record on drop even
/// if the producer unwinds.
struct LeaderGuard<'a, K, V, E>
where
    K: Clone + Eq + Hash,
    E: Clone,
{
    coordinator: &'a LoadCoordinator<K, V, E>,
    key: K,
    pending: Arc<PendingLoad<V, E>>,
    finished: bool,
}

impl<K, V, E> LeaderGuard<'_, K, V, E>
where
    K: Clone + Eq + Hash,
    E: Clone,
{
    fn run<F>(mut self, load: F) -> Result<Arc<V>, CacheError<E>>
    where
        F: FnOnce() -> Result<Arc<V>, E>,
    {
        tracing::trace!("starting load");
        let result = load();
        if result.is_err() {
            tracing::debug!("load failed; releasing waiters with the error");
        }
        self.finish(Outcome::Ready(result.clone()));
        result.map_err(CacheError::Load)
    }

    fn finish(&mut self, outcome: Outcome<V, E>) {
        self.finished = true;
        self.pending.publish(outcome);
        self.coordinator.unregister(&self.key, &self.pending);
    }
}

impl<K, V, E> Drop for LeaderGuard<'_, K, V, E>
where
    K: Clone + Eq + Hash,
    E: Clone,
{
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("load abandoned before completing; waiters will retry");
            self.finish(Outcome::Abandoned);
        }
    }
}
