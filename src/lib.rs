//! arcache: bounded in-memory loading cache with adaptive replacement.
//!
//! The [`Cache`](cache::Cache) frontend combines a replacement engine
//! ([`ArcCore`](policy::arc::ArcCore) by default,
//! [`LruCore`](policy::lru::LruCore) as a sibling), lazy per-entry expiration,
//! and a loader that runs at most once per key under concurrent misses.
//!
//! ```
//! use arcache::prelude::*;
//!
//! let cache = CacheBuilder::new(128)
//!     .loader(|id: &u64| Ok::<_, String>(format!("user-{id}")))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(*cache.get(&42).unwrap(), "user-42");
//! assert_eq!(cache.hit_count(), 0);
//! assert_eq!(*cache.get(&42).unwrap(), "user-42");
//! assert_eq!(cache.hit_count(), 1);
//! ```

pub mod builder;
pub mod cache;
pub mod clock;
pub mod ds;
pub mod entry;
pub mod error;
pub mod expiry;
pub mod loader;
pub mod policy;
pub mod prelude;
pub mod stats;
pub mod traits;
