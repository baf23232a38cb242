pub use crate::builder::{CacheBuilder, CacheConfig, CachePolicy};
pub use crate::cache::Cache;
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::ds::{GhostList, IntrusiveList, SlotArena, SlotId};
pub use crate::error::{CacheError, ConfigError};
pub use crate::expiry::ExpirationMode;
pub use crate::policy::arc::ArcCore;
pub use crate::policy::lru::LruCore;
pub use crate::stats::CacheStatsSnapshot;
pub use crate::traits::{Access, EvictionEngine};
