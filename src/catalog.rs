//! Application-level entry point.
//!
//! Holds the shared collaborators (store, cache, hasher, config) and hands
//! out per-request services over them.

use crate::auth::AuthenticationService;
use crate::backend::CacheBackend;
use crate::cache::CacheGateway;
use crate::config::CatalogConfig;
use crate::entity::CatalogEntity;
use crate::hasher::{Argon2Hasher, PasswordHasher};
use crate::model::{Author, Book, Genre, User};
use crate::observability::CacheMetrics;
use crate::repository::Store;
use crate::service::EntityService;
use std::sync::Arc;

/// Shared catalog handle.
///
/// Cloning is cheap: the store and cache backend are handles over shared
/// state, the hasher and config sit behind `Arc`. Services built from any
/// clone see the same data and the same cache.
///
/// # Example
///
/// ```ignore
/// use catalog_kit::{Catalog, backend::InMemoryBackend, repository::InMemoryStore};
///
/// let catalog = Catalog::new(InMemoryStore::new(), InMemoryBackend::new());
///
/// // In a request handler
/// let author = catalog.authors().get_by_id(id).await?;
/// let signed_in = catalog.authentication().sign_in(&credentials).await?;
/// ```
#[derive(Clone)]
pub struct Catalog<S: Store, B: CacheBackend> {
    store: S,
    cache: CacheGateway<B>,
    hasher: Arc<dyn PasswordHasher>,
    config: Arc<CatalogConfig>,
}

impl<S: Store, B: CacheBackend> Catalog<S, B> {
    /// Catalog with default config and an Argon2id hasher.
    pub fn new(store: S, backend: B) -> Self {
        Self::with_config(store, backend, CatalogConfig::default())
    }

    pub fn with_config(store: S, backend: B, config: CatalogConfig) -> Self {
        Catalog {
            store,
            cache: CacheGateway::new(backend),
            hasher: Arc::new(Argon2Hasher::new(config.kdf.clone())),
            config: Arc::new(config),
        }
    }

    /// Replace the password hasher.
    pub fn with_hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    /// Set custom metrics handler on the shared cache.
    pub fn with_metrics(mut self, metrics: Arc<dyn CacheMetrics>) -> Self {
        self.cache = self.cache.with_metrics(metrics);
        self
    }

    /// Service for any entity type.
    pub fn service<E: CatalogEntity>(&self) -> EntityService<E, S, B> {
        EntityService::new(self.store.clone(), self.cache.clone(), Arc::clone(&self.hasher))
            .with_ttl_policy(self.config.ttl_policy.clone())
    }

    pub fn authors(&self) -> EntityService<Author, S, B> {
        self.service()
    }

    pub fn books(&self) -> EntityService<Book, S, B> {
        self.service()
    }

    pub fn genres(&self) -> EntityService<Genre, S, B> {
        self.service()
    }

    pub fn users(&self) -> EntityService<User, S, B> {
        self.service()
    }

    pub fn authentication(&self) -> AuthenticationService<S> {
        AuthenticationService::new(self.store.clone(), Arc::clone(&self.hasher))
    }

    pub fn cache(&self) -> &CacheGateway<B> {
        &self.cache
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::hasher::KdfParams;
    use crate::model::GenreDto;
    use crate::pagination::Pagination;
    use crate::repository::InMemoryStore;

    fn catalog() -> Catalog<InMemoryStore, InMemoryBackend> {
        Catalog::with_config(
            InMemoryStore::new(),
            InMemoryBackend::new(),
            CatalogConfig::default().with_kdf(KdfParams::fast()),
        )
    }

    #[tokio::test]
    async fn test_clones_share_store_and_cache() {
        let catalog = catalog();
        let other = catalog.clone();

        catalog
            .genres()
            .add(GenreDto {
                name: "Drama".to_string(),
                ..GenreDto::default()
            })
            .await
            .expect("Failed to add");

        let genres = other
            .genres()
            .get_all(Pagination::all())
            .await
            .expect("Failed to read");
        assert_eq!(genres.len(), 1);
        assert_eq!(catalog.cache().epoch(), other.cache().epoch());
    }

    #[test]
    fn test_config_is_kept() {
        let catalog = catalog();
        assert_eq!(catalog.config().kdf, KdfParams::fast());
    }
}
