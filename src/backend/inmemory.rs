//! In-memory cache backend (default, thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! Every entry is tagged with the epoch it was written in. `clear_all` only
//! advances the epoch, which hides every older entry at once; hidden and
//! expired entries are removed lazily when next touched.

use super::{CacheBackend, Epoch};
use crate::error::Result;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

/// In-memory cache entry with optional expiration.
struct CacheEntry {
    data: Vec<u8>,
    expires_at: Option<Instant>,
    epoch: Epoch,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Option<Duration>, epoch: Epoch) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        CacheEntry {
            data,
            expires_at,
            epoch,
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }

    fn is_live(&self, current: Epoch) -> bool {
        self.epoch == current && !self.is_expired()
    }
}

/// Thread-safe async in-memory cache backend.
///
/// Cloning shares the same map and epoch.
///
/// # Example
///
/// ```no_run
/// use catalog_kit::backend::{CacheBackend, InMemoryBackend};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = InMemoryBackend::new();
///
///     backend.set("Genre:id:1", b"value".to_vec(), Some(Duration::from_secs(600))).await?;
///     assert!(backend.get("Genre:id:1").await?.is_some());
///
///     backend.clear_all().await?;
///     assert!(backend.get("Genre:id:1").await?.is_none());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, CacheEntry>>,
    epoch: Arc<AtomicU64>,
}

impl InMemoryBackend {
    /// Create a new in-memory cache backend.
    pub fn new() -> Self {
        InMemoryBackend {
            store: Arc::new(DashMap::new()),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    fn current(&self) -> Epoch {
        self.epoch.load(Ordering::Acquire)
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let current = self.current();
        self.store
            .iter()
            .filter(|entry| entry.is_live(current))
            .count()
    }

    /// Check if cache holds no live entry.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every expired or superseded entry now instead of on next access.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_stale(&self) -> usize {
        let current = self.current();
        let before = self.store.len();
        self.store.retain(|_, entry| entry.is_live(current));
        let removed = before.saturating_sub(self.store.len());
        debug!("InMemory PURGE removed {} stale entries", removed);
        removed
    }

    /// Get memory statistics.
    pub async fn stats(&self) -> CacheStats {
        let current = self.current();
        let mut stats = CacheStats {
            epoch: current,
            ..CacheStats::default()
        };
        for entry in self.store.iter() {
            stats.total_entries += 1;
            stats.total_bytes += entry.data.len();
            if !entry.is_live(current) {
                stats.stale_entries += 1;
            }
        }
        stats
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let current = self.current();
        if let Some(entry) = self.store.get(key) {
            if entry.is_live(current) {
                debug!("InMemory GET {} -> HIT", key);
                return Ok(Some(entry.data.clone()));
            }
        }

        // Only evict what is still stale; a concurrent writer may have
        // replaced the entry since the check above.
        self.store
            .remove_if(key, |_, entry| !entry.is_live(current));
        debug!("InMemory GET {} -> MISS", key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let entry = CacheEntry::new(value, ttl, self.current());
        self.store.insert(key.to_string(), entry);
        debug!("InMemory SET {} (TTL: {:?})", key, ttl);
        Ok(())
    }

    async fn set_in_epoch(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
        epoch: Epoch,
    ) -> Result<()> {
        if epoch != self.current() {
            debug!("InMemory SET {} skipped: epoch {} superseded", key, epoch);
            return Ok(());
        }

        // A reset racing with this insert leaves the entry tagged with the
        // old epoch, so it is never served.
        self.store
            .insert(key.to_string(), CacheEntry::new(value, ttl, epoch));
        debug!("InMemory SET {} (TTL: {:?}, epoch {})", key, ttl, epoch);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.remove(key);
        debug!("InMemory DELETE {}", key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let current = self.current();
        Ok(self
            .store
            .get(key)
            .is_some_and(|entry| entry.is_live(current)))
    }

    fn epoch(&self) -> Epoch {
        self.current()
    }

    async fn clear_all(&self) -> Result<()> {
        let previous = self.epoch.fetch_add(1, Ordering::AcqRel);
        warn!("InMemory CLEAR_ALL executed - epoch {} -> {}", previous, previous + 1);
        Ok(())
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Default)]
pub struct CacheStats {
    pub total_entries: usize,
    /// Expired or written before the last reset.
    pub stale_entries: usize,
    pub total_bytes: usize,
    pub epoch: Epoch,
}
