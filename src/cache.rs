//! Typed cache gateway shared by every service.

use crate::backend::{CacheBackend, Epoch};
use crate::error::{Error, Result};
use crate::observability::{CacheMetrics, LogMetrics};
use crate::serialization::{deserialize_from_cache, serialize_for_cache};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Typed `get` / `set` / `remove` / `reset_all` over a byte-oriented backend.
///
/// Values travel through the versioned postcard envelope. An entry that no
/// longer decodes (foreign magic, other schema version, corruption) is
/// evicted and reported as a miss. Backend failures propagate.
///
/// Cloning is cheap and shares the backend and metrics sink.
pub struct CacheGateway<B: CacheBackend> {
    backend: B,
    metrics: Arc<dyn CacheMetrics>,
}

impl<B: CacheBackend> Clone for CacheGateway<B> {
    fn clone(&self) -> Self {
        CacheGateway {
            backend: self.backend.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<B: CacheBackend> CacheGateway<B> {
    pub fn new(backend: B) -> Self {
        CacheGateway {
            backend,
            metrics: Arc::new(LogMetrics),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Arc<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Cached value for `key`, or `None` on miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let timer = Instant::now();
        let Some(bytes) = self.backend.get(key).await? else {
            self.metrics.record_miss(key, timer.elapsed());
            return Ok(None);
        };

        match deserialize_from_cache::<T>(&bytes) {
            Ok(value) => {
                self.metrics.record_hit(key, timer.elapsed());
                Ok(Some(value))
            }
            Err(
                e @ (Error::DeserializationError(_)
                | Error::InvalidCacheEntry(_)
                | Error::VersionMismatch { .. }),
            ) => {
                self.metrics.record_error(key, &e.to_string());
                self.backend.delete(key).await?;
                self.metrics.record_miss(key, timer.elapsed());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Store `value` under `key` in the current epoch.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()> {
        let timer = Instant::now();
        let bytes = serialize_for_cache(value)?;
        self.backend.set(key, bytes, ttl).await?;
        self.metrics.record_set(key, timer.elapsed());
        Ok(())
    }

    /// Store `value` unless the cache was reset since `epoch` was captured.
    pub async fn set_in_epoch<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
        epoch: Epoch,
    ) -> Result<()> {
        let timer = Instant::now();
        let bytes = serialize_for_cache(value)?;
        self.backend.set_in_epoch(key, bytes, ttl, epoch).await?;
        self.metrics.record_set(key, timer.elapsed());
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        self.backend.delete(key).await
    }

    /// Current epoch; capture it before reading the store.
    pub fn epoch(&self) -> Epoch {
        self.backend.epoch()
    }

    /// Invalidate every cached value of every entity type.
    pub async fn reset_all(&self) -> Result<()> {
        self.backend.clear_all().await?;
        self.metrics.record_reset();
        Ok(())
    }

    /// Get backend reference (for advanced use).
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
