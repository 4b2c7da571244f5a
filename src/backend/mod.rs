//! Cache backend implementations.

use crate::error::Result;
use std::time::Duration;

pub mod inmemory;

pub use inmemory::{CacheStats, InMemoryBackend};

/// Generation counter of a backend. Every [`CacheBackend::clear_all`]
/// advances it.
pub type Epoch = u64;

/// Trait for cache backend implementations.
///
/// A backend is a shared key/value store of opaque bytes with lazy TTL
/// expiry and a whole-cache reset.
///
/// **IMPORTANT:** All methods use `&self` instead of `&mut self` to allow concurrent access.
/// Backend implementations should use interior mutability.
///
/// # Epochs
///
/// A reader that computes a value from storage must not publish it after a
/// concurrent writer has reset the cache, or the stale value would outlive
/// the reset. Readers therefore capture [`epoch`](Self::epoch) before they
/// read storage and publish with [`set_in_epoch`](Self::set_in_epoch); the
/// backend drops (or hides) values whose epoch is no longer current.
#[allow(async_fn_in_trait)]
pub trait CacheBackend: Send + Sync + Clone {
    /// Retrieve value from cache by key.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Value found and not expired
    /// - `Ok(None)` - Cache miss (absent, expired, or from an older epoch)
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store value in the current epoch with optional TTL.
    ///
    /// `ttl` of `None` keeps the entry until the next reset.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Store value only if `epoch` is still current.
    ///
    /// A value published after a reset that happened since `epoch` was
    /// captured must never become visible.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn set_in_epoch(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
        epoch: Epoch,
    ) -> Result<()>;

    /// Remove value from cache.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a live value exists for `key`.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Current epoch.
    fn epoch(&self) -> Epoch;

    /// Invalidate every entry and advance the epoch.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn clear_all(&self) -> Result<()>;

    /// Health check - verify backend is accessible.
    ///
    /// # Errors
    /// Returns `Err` if backend is not accessible
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_backend_exists_default() {
        let backend = InMemoryBackend::new();
        backend
            .set("key", vec![1, 2, 3], None)
            .await
            .expect("Failed to set key");
        assert!(backend.exists("key").await.expect("Failed to check exists"));
        assert!(!backend
            .exists("nonexistent")
            .await
            .expect("Failed to check exists"));
    }

    #[tokio::test]
    async fn test_clear_all_advances_epoch() {
        let backend = InMemoryBackend::new();
        let before = backend.epoch();
        backend.clear_all().await.expect("Failed to clear");
        assert_eq!(backend.epoch(), before + 1);
        assert!(backend.health_check().await.expect("Failed health check"));
    }
}
