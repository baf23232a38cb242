//! Error types for the arcache library.
//!
//! ## Key Components
//!
//! - [`CacheError`]: Returned by lookups on the [`Cache`](crate::cache::Cache)
//!   frontend (missing key, loader failure, waiter timeout).
//! - [`ConfigError`]: Returned by [`CacheBuilder::build`](crate::builder::CacheBuilder::build)
//!   when configuration parameters are invalid (zero capacity, conflicting
//!   loaders, zero TTL).
//!
//! ## Example Usage
//!
//! ```
//! use arcache::builder::CacheBuilder;
//! use arcache::error::CacheError;
//!
//! let cache = CacheBuilder::<u32, String>::new(8).build().unwrap();
//! assert_eq!(cache.get(&1), Err(CacheError::NotFound));
//!
//! let bad = CacheBuilder::<u32, String>::new(0).build();
//! assert!(bad.unwrap_err().to_string().contains("capacity"));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Failure of a cache lookup.
///
/// `E` is the loader's own error type. It is cloned verbatim to every caller
/// that was waiting on the failed load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError<E> {
    /// The key is absent and no loader is configured (or the lookup was
    /// `get_if_present`).
    #[error("key not found")]
    NotFound,

    /// The loader returned an error; the key stays absent.
    #[error("loader failed: {0}")]
    Load(E),

    /// The caller stopped waiting on another caller's in-flight load.
    #[error("timed out waiting for in-flight load")]
    Timeout,
}

impl<E> CacheError<E> {
    /// Returns `true` for [`CacheError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// The loader's error, if this is a load failure.
    pub fn load_error(&self) -> Option<&E> {
        match self {
            Self::Load(err) => Some(err),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`CacheBuilder::build`](crate::builder::CacheBuilder::build).
/// Carries a human-readable description of which parameter failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
