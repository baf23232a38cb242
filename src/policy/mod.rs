//! Replacement engines.
//!
//! | Engine                | Lists              | Adaptive |
//! |-----------------------|--------------------|----------|
//! | [`arc::ArcCore`]      | T1, T2, B1, B2     | yes (`p`)|
//! | [`lru::LruCore`]      | one recency list   | no       |

pub mod arc;
pub mod lru;
