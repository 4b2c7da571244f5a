//! Observability hooks and TTL policies for cached reads.
//!
//! - **Metrics (`CacheMetrics`)**: hits, misses, sets, resets and decode
//!   errors reported by the cache gateway.
//! - **TTL Policies (`TtlPolicy`)**: how long a cached read stays valid.
//!
//! # Metrics
//!
//! ```ignore
//! use catalog_kit::observability::CacheMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl CacheMetrics for PrometheusMetrics {
//!     fn record_hit(&self, _key: &str, _duration: Duration) {
//!         // counter!("catalog_cache_hits").inc();
//!     }
//! }
//!
//! // let catalog = Catalog::new(store, backend).with_metrics(Arc::new(PrometheusMetrics));
//! ```
//!
//! Unless overridden, the gateway uses [`LogMetrics`], which logs via the
//! `log` crate.
//!
//! # TTL Policies
//!
//! | Policy | Use Case |
//! |--------|----------|
//! | `Fixed` | Uniform duration (10 minutes by default) |
//! | `Infinite` | Keep until the next write resets the cache |
//! | `PerType` | Different duration per entity type |

use crate::repository::Kind;
use std::time::Duration;

/// Default lifetime of a cached read.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Trait for cache metrics collection.
pub trait CacheMetrics: Send + Sync {
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Cache HIT: {} took {:?}", key, duration);
    }

    fn record_miss(&self, key: &str, duration: Duration) {
        debug!("Cache MISS: {} took {:?}", key, duration);
    }

    fn record_set(&self, key: &str, duration: Duration) {
        debug!("Cache SET: {} took {:?}", key, duration);
    }

    /// Record a whole-cache reset.
    fn record_reset(&self) {
        debug!("Cache RESET");
    }

    /// Record an unreadable entry or a backend failure.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Cache ERROR for {}: {}", key, error);
    }
}

/// Metrics sink that only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogMetrics;

impl CacheMetrics for LogMetrics {}

/// Metrics sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
    fn record_set(&self, _key: &str, _duration: Duration) {}
    fn record_reset(&self) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}

/// TTL (Time-to-Live) policy for cached reads.
#[derive(Clone, Debug)]
pub enum TtlPolicy {
    /// Fixed duration for all entries
    Fixed(Duration),

    /// No TTL (entries live until the next reset)
    Infinite,

    /// Custom per-type policy
    PerType(fn(Kind) -> Duration),
}

impl Default for TtlPolicy {
    fn default() -> Self {
        TtlPolicy::Fixed(DEFAULT_TTL)
    }
}

impl TtlPolicy {
    /// Get TTL for an entity type.
    pub fn get_ttl(&self, kind: Kind) -> Option<Duration> {
        match self {
            TtlPolicy::Fixed(d) => Some(*d),
            TtlPolicy::Infinite => None,
            TtlPolicy::PerType(f) => Some(f(kind)),
        }
    }
}
