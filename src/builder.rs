//! Fluent construction of [`Cache`] instances.
//!
//! Selects the replacement strategy, wires the optional loader and callbacks,
//! and validates the configuration before handing out a cache.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use arcache::builder::{CacheBuilder, CachePolicy};
//!
//! let cache = CacheBuilder::new(100)
//!     .policy(CachePolicy::Arc)
//!     .expiration(Duration::from_secs(30))
//!     .loader(|key: &u64| Ok::<_, String>(key.to_string()))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(*cache.get(&1).unwrap(), "1");
//! ```
//!
//! ## Validation
//!
//! | Condition                                        | Result          |
//! |--------------------------------------------------|-----------------|
//! | `capacity == 0`                                  | `ConfigError`   |
//! | both `loader` and `loader_with_expiration` set   | `ConfigError`   |
//! | `expiration(Duration::ZERO)`                     | `ConfigError`   |

use std::convert::Infallible;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Cache, Callbacks, Loader};
use crate::clock::{Clock, SystemClock};
use crate::error::ConfigError;
use crate::expiry::{ExpirationMode, ExpirationPolicy};

/// Available replacement strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Adaptive Replacement Cache.
    #[default]
    Arc,
    /// Least Recently Used.
    Lru,
}

/// Plain-data cache configuration.
///
/// Everything that is not a closure; feed it to
/// [`CacheBuilder::from_config`] and add callbacks on the returned builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub capacity: usize,
    pub policy: CachePolicy,
    pub ttl: Option<Duration>,
    pub expiration_mode: ExpirationMode,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            policy: CachePolicy::Arc,
            ttl: None,
            expiration_mode: ExpirationMode::Fixed,
        }
    }
}

impl CacheConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than zero"));
        }
        if self.ttl == Some(Duration::ZERO) {
            return Err(ConfigError::new("expiration must be greater than zero"));
        }
        Ok(())
    }
}

/// Builder for [`Cache`].
///
/// `E` is fixed by [`loader`](Self::loader) or
/// [`loader_with_expiration`](Self::loader_with_expiration); without a loader
/// it stays [`Infallible`].
pub struct CacheBuilder<K, V, E = Infallible> {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    loader: Option<Loader<K, V, E>>,
    conflicting_loaders: bool,
    callbacks: Callbacks<K, V>,
}

impl<K, V> CacheBuilder<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Starts an ARC builder holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self::from_config(CacheConfig {
            capacity,
            ..CacheConfig::default()
        })
    }

    /// Starts a builder from plain configuration.
    pub fn from_config(config: CacheConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            loader: None,
            conflicting_loaders: false,
            callbacks: Callbacks::default(),
        }
    }
}

impl<K, V, E> CacheBuilder<K, V, E>
where
    K: Clone + Eq + Hash,
{
    pub fn arc(self) -> Self {
        self.policy(CachePolicy::Arc)
    }

    pub fn lru(self) -> Self {
        self.policy(CachePolicy::Lru)
    }

    pub fn policy(mut self, policy: CachePolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Producer invoked on a miss. Concurrent misses on one key share a call.
    pub fn loader<F, E2>(self, load: F) -> CacheBuilder<K, V, E2>
    where
        F: Fn(&K) -> Result<V, E2> + Send + Sync + 'static,
    {
        self.with_loader(Loader::Plain(Box::new(load)))
    }

    /// Producer that also chooses the TTL of the entry it produces
    /// (`None` falls back to the cache-wide TTL).
    pub fn loader_with_expiration<F, E2>(self, load: F) -> CacheBuilder<K, V, E2>
    where
        F: Fn(&K) -> Result<(V, Option<Duration>), E2> + Send + Sync + 'static,
    {
        self.with_loader(Loader::WithExpiration(Box::new(load)))
    }

    fn with_loader<E2>(self, loader: Loader<K, V, E2>) -> CacheBuilder<K, V, E2> {
        CacheBuilder {
            config: self.config,
            clock: self.clock,
            conflicting_loaders: self.conflicting_loaders || self.loader.is_some(),
            loader: Some(loader),
            callbacks: self.callbacks,
        }
    }

    /// Called with every live entry displaced by an insert or found expired.
    pub fn evicted_func<F>(mut self, evicted: F) -> Self
    where
        F: Fn(K, Arc<V>) + Send + Sync + 'static,
    {
        self.callbacks.evicted = Some(Box::new(evicted));
        self
    }

    /// Called with every live entry dropped by [`Cache::purge`].
    pub fn purge_visitor_func<F>(mut self, visit: F) -> Self
    where
        F: Fn(K, Arc<V>) + Send + Sync + 'static,
    {
        self.callbacks.purge_visitor = Some(Box::new(visit));
        self
    }

    /// Called after every `set` and every committed load.
    pub fn added_func<F>(mut self, added: F) -> Self
    where
        F: Fn(&K, &Arc<V>) + Send + Sync + 'static,
    {
        self.callbacks.added = Some(Box::new(added));
        self
    }

    /// Cache-wide TTL for new entries.
    pub fn expiration(mut self, ttl: Duration) -> Self {
        self.config.ttl = Some(ttl);
        self
    }

    pub fn expiration_mode(mut self, mode: ExpirationMode) -> Self {
        self.config.expiration_mode = mode;
        self
    }

    /// Shorthand for [`expiration_mode`](Self::expiration_mode).
    pub fn refresh_on_access(self, refresh: bool) -> Self {
        self.expiration_mode(if refresh {
            ExpirationMode::RefreshOnAccess
        } else {
            ExpirationMode::Fixed
        })
    }

    /// Time source used for expiration deadlines.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validates the configuration and builds the cache.
    pub fn build(self) -> Result<Cache<K, V, E>, ConfigError>
    where
        E: Clone,
    {
        self.config.validate()?;
        if self.conflicting_loaders {
            return Err(ConfigError::new(
                "loader and loader_with_expiration are mutually exclusive",
            ));
        }
        tracing::debug!(
            capacity = self.config.capacity,
            policy = ?self.config.policy,
            ttl = ?self.config.ttl,
            "building cache"
        );
        Ok(Cache::from_parts(
            self.config.policy,
            self.config.capacity,
            ExpirationPolicy::new(self.config.ttl, self.config.expiration_mode),
            self.clock,
            self.loader,
            self.callbacks,
        ))
    }
}
