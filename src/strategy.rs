//! Read strategies for cached list and detail reads.
//!
//! | Strategy | Cache Hit | Cache Miss | Use Case |
//! |----------|-----------|-----------|----------|
//! | **Refresh** | Return | Read store, cache | Default cache-aside |
//! | **Invalidate** | Evict, read store, cache | Read store, cache | Caller knows the entry is stale |
//! | **Bypass** | Ignore, read store, cache | Read store, cache | Force a fresh read, keep the cache warm |
//!
//! Every strategy publishes the value it read so the next `Refresh` hits.

use std::fmt;

/// Strategy enum controlling cache lookup behavior on reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CacheStrategy {
    /// Try cache first, fall back to the store on miss and cache the result.
    #[default]
    Refresh,

    /// Evict the key first, then behave like a miss.
    Invalidate,

    /// Skip the lookup, read the store and cache the result.
    Bypass,
}

impl fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheStrategy::Refresh => write!(f, "Refresh"),
            CacheStrategy::Invalidate => write!(f, "Invalidate"),
            CacheStrategy::Bypass => write!(f, "Bypass"),
        }
    }
}
