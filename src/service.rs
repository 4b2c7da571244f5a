//! Generic entity service: cache-aside reads, validated writes.

use crate::backend::CacheBackend;
use crate::cache::CacheGateway;
use crate::entity::{CatalogEntity, EntityId, WriteContext, WriteMode};
use crate::error::{Error, Result};
use crate::hasher::{offload, PasswordHasher};
use crate::key::CacheKeyBuilder;
use crate::observability::TtlPolicy;
use crate::pagination::Pagination;
use crate::repository::{Record, Store, UnitOfWork};
use crate::strategy::CacheStrategy;
use crate::validation::{not_found, ValidationResult, Validator};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// CRUD orchestration for one entity type.
///
/// Reads go through the cache (keyed by entity name plus page or id) and
/// fall back to a read session of the store. Writes take an exclusive write
/// session, validate, reset the whole cache, resolve relations, persist and
/// commit, in that order. Because the write session is held from validation
/// to commit, two writers can never both pass a uniqueness check against the
/// same snapshot.
///
/// Reads capture the cache epoch before touching the store, so a value read
/// before a concurrent write can never be published after that write's
/// reset.
///
/// # Example
///
/// ```ignore
/// let genres = catalog.genres();
/// let created = genres.add(GenreDto { name: "Drama".into(), ..Default::default() }).await?;
/// let page = genres.get_all(Pagination::new(1, 20)).await?;
/// ```
pub struct EntityService<E: CatalogEntity, S: Store, B: CacheBackend> {
    store: S,
    cache: CacheGateway<B>,
    hasher: Arc<dyn PasswordHasher>,
    ttl_policy: TtlPolicy,
    validator: E::Validator,
}

impl<E, S, B> EntityService<E, S, B>
where
    E: CatalogEntity,
    S: Store,
    B: CacheBackend,
{
    pub fn new(store: S, cache: CacheGateway<B>, hasher: Arc<dyn PasswordHasher>) -> Self {
        EntityService {
            store,
            cache,
            hasher,
            ttl_policy: TtlPolicy::default(),
            validator: E::Validator::default(),
        }
    }

    /// Set custom TTL policy.
    pub fn with_ttl_policy(mut self, policy: TtlPolicy) -> Self {
        self.ttl_policy = policy;
        self
    }

    fn ttl(&self) -> Option<Duration> {
        self.ttl_policy.get_ttl(E::KIND)
    }

    /// One page of every row, ordered by id. Cache-aside.
    ///
    /// # Errors
    ///
    /// Store and cache failures propagate unchanged.
    pub async fn get_all(&self, pagination: Pagination) -> Result<Vec<E::Dto>> {
        self.get_all_with(pagination, CacheStrategy::Refresh).await
    }

    pub async fn get_all_with(
        &self,
        pagination: Pagination,
        strategy: CacheStrategy,
    ) -> Result<Vec<E::Dto>> {
        let timer = Instant::now();
        let key = CacheKeyBuilder::page::<E>(&pagination);
        let epoch = self.cache.epoch();

        if let Some(models) = self.lookup::<Vec<E::Dto>>(&key, strategy).await? {
            debug!("{} served from cache in {:?}", key, timer.elapsed());
            return Ok(models);
        }

        let session = self.store.read().await?;
        let mut records = E::find_all(&session).await?;
        drop(session);

        records.sort_by_key(|record| record.id());
        let models: Vec<E::Dto> = pagination
            .apply(records)
            .iter()
            .map(E::to_dto)
            .collect();

        self.cache
            .set_in_epoch(&key, &models, self.ttl(), epoch)
            .await?;
        debug!("{} loaded from store in {:?}", key, timer.elapsed());
        Ok(models)
    }

    /// Single row by id.
    ///
    /// # Errors
    ///
    /// `Error::ValidationFailed` with `"<Entity> with id <id> does not exist"`
    /// when the row is absent; the existence check runs before the cache
    /// lookup.
    pub async fn get_by_id(&self, id: EntityId) -> Result<E::Dto> {
        self.get_by_id_with(id, CacheStrategy::Refresh).await
    }

    pub async fn get_by_id_with(&self, id: EntityId, strategy: CacheStrategy) -> Result<E::Dto> {
        let key = CacheKeyBuilder::id::<E>(id);
        let epoch = self.cache.epoch();
        let session = self.store.read().await?;

        let validation = self.validator.validate_id(&session, id).await?;
        self.reject_invalid("read", validation)?;

        if let Some(model) = self.lookup::<E::Dto>(&key, strategy).await? {
            return Ok(model);
        }

        let record = E::find(&session, id)
            .await?
            .ok_or_else(|| Error::validation([not_found(E::KIND.name(), id)]))?;
        drop(session);

        let model = E::to_dto(&record);
        self.cache
            .set_in_epoch(&key, &model, self.ttl(), epoch)
            .await?;
        Ok(model)
    }

    /// Validate and insert. Returns the caller's model (secrets stripped),
    /// not the persisted row.
    ///
    /// # Errors
    ///
    /// `Error::ValidationFailed` with every violation found; nothing is
    /// written and the cache is untouched in that case.
    pub async fn add(&self, model: E::Dto) -> Result<E::Dto> {
        let digest = self.digest(&model).await?;
        let mut session = self.store.write().await?;

        let validation = self.validator.validate_for_add(&session, &model, true).await?;
        self.reject_invalid("add", validation)?;

        self.cache.reset_all().await?;
        let ctx = WriteContext {
            password_digest: digest.as_deref(),
            mode: WriteMode::Add,
        };
        let record = E::resolve(&session, &model, &ctx).await?;
        let persisted = E::insert(&mut session, record).await?;
        session.save().await?;

        info!("{} {} added", E::KIND, persisted.id());
        Ok(E::to_response(model))
    }

    /// Validate and replace the whole row. Returns the stored row.
    ///
    /// # Errors
    ///
    /// `Error::ValidationFailed` for a zero or unknown id and for every
    /// add-time violation; uniqueness ignores the row's own values.
    pub async fn update(&self, model: E::Dto) -> Result<E::Dto> {
        let digest = self.digest(&model).await?;
        let mut session = self.store.write().await?;

        let validation = self.validator.validate_for_update(&session, &model).await?;
        self.reject_invalid("update", validation)?;

        self.cache.reset_all().await?;
        let ctx = WriteContext {
            password_digest: digest.as_deref(),
            mode: WriteMode::Update,
        };
        let record = E::resolve(&session, &model, &ctx).await?;
        let persisted = E::replace(&mut session, record).await?;
        session.save().await?;

        let stored = E::find(&session, persisted.id())
            .await?
            .unwrap_or(persisted);
        info!("{} {} updated", E::KIND, stored.id());
        Ok(E::to_dto(&stored))
    }

    /// Remove a row. Returns it as it was before deletion.
    ///
    /// # Errors
    ///
    /// `Error::ValidationFailed` when the row does not exist.
    pub async fn delete(&self, id: EntityId) -> Result<E::Dto> {
        let mut session = self.store.write().await?;

        let validation = self.validator.validate_id(&session, id).await?;
        self.reject_invalid("delete", validation)?;

        self.cache.reset_all().await?;
        let removed = E::remove(&mut session, id)
            .await?
            .ok_or_else(|| Error::validation([not_found(E::KIND.name(), id)]))?;
        session.save().await?;

        info!("{} {} deleted", E::KIND, id);
        Ok(E::to_dto(&removed))
    }

    async fn lookup<T: DeserializeOwned>(
        &self,
        key: &str,
        strategy: CacheStrategy,
    ) -> Result<Option<T>> {
        match strategy {
            CacheStrategy::Refresh => self.cache.get(key).await,
            CacheStrategy::Invalidate => {
                self.cache.remove(key).await?;
                Ok(None)
            }
            CacheStrategy::Bypass => Ok(None),
        }
    }

    /// Hash the model's password, if it has one, before any session opens.
    async fn digest(&self, model: &E::Dto) -> Result<Option<String>> {
        let Some(password) = E::password(model) else {
            return Ok(None);
        };
        let password = password.to_string();
        let digest = offload(&self.hasher, move |hasher| hasher.hash(&password)).await??;
        Ok(Some(digest))
    }

    fn reject_invalid(&self, operation: &str, validation: ValidationResult) -> Result<()> {
        if !validation.is_valid() {
            warn!(
                "{} {} rejected: {}",
                E::KIND,
                operation,
                validation.messages().join(", ")
            );
        }
        validation.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::hasher::{Argon2Hasher, KdfParams};
    use crate::model::{Genre, GenreDto};
    use crate::repository::{InMemoryStore, Kind};

    fn service(
        store: &InMemoryStore,
        backend: &InMemoryBackend,
    ) -> EntityService<Genre, InMemoryStore, InMemoryBackend> {
        EntityService::new(
            store.clone(),
            CacheGateway::new(backend.clone()),
            Arc::new(Argon2Hasher::new(KdfParams::fast())),
        )
    }

    fn genre(name: &str) -> GenreDto {
        GenreDto {
            name: name.to_string(),
            ..GenreDto::default()
        }
    }

    #[tokio::test]
    async fn test_add_then_read() {
        let store = InMemoryStore::new();
        let genres = service(&store, &InMemoryBackend::new());

        let echoed = genres.add(genre("Drama")).await.expect("Failed to add");
        assert_eq!(echoed.id, 0, "add echoes the caller's model");

        let stored = genres.get_by_id(1).await.expect("Failed to read");
        assert_eq!(stored.name, "Drama");
        assert_eq!(stored.id, 1);
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let store = InMemoryStore::new();
        let genres = service(&store, &InMemoryBackend::new());
        genres.add(genre("Drama")).await.expect("Failed to add");
        store.reset_scan_counters();

        genres.get_all(Pagination::all()).await.expect("Failed to read");
        genres.get_all(Pagination::all()).await.expect("Failed to read");

        assert_eq!(store.full_scans(Kind::Genre), 1);
    }

    #[tokio::test]
    async fn test_strategies_force_store_reads() {
        let store = InMemoryStore::new();
        let genres = service(&store, &InMemoryBackend::new());
        genres.add(genre("Drama")).await.expect("Failed to add");
        store.reset_scan_counters();

        genres.get_all(Pagination::all()).await.expect("Failed to read");
        genres
            .get_all_with(Pagination::all(), CacheStrategy::Bypass)
            .await
            .expect("Failed to read");
        genres
            .get_all_with(Pagination::all(), CacheStrategy::Invalidate)
            .await
            .expect("Failed to read");
        genres.get_all(Pagination::all()).await.expect("Failed to read");

        assert_eq!(store.full_scans(Kind::Genre), 3);
    }

    #[tokio::test]
    async fn test_rejected_write_keeps_cache() {
        let store = InMemoryStore::new();
        let backend = InMemoryBackend::new();
        let genres = service(&store, &backend);
        genres.add(genre("Drama")).await.expect("Failed to add");
        genres.get_all(Pagination::all()).await.expect("Failed to read");
        let epoch = backend.epoch();

        let err = genres.add(genre("Drama")).await.expect_err("duplicate name");
        assert_eq!(err.messages(), ["Genre with name Drama already exists"]);
        assert_eq!(backend.epoch(), epoch);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_row() {
        let store = InMemoryStore::new();
        let genres = service(&store, &InMemoryBackend::new());
        genres.add(genre("Drama")).await.expect("Failed to add");

        let removed = genres.delete(1).await.expect("Failed to delete");
        assert_eq!(removed.name, "Drama");

        let err = genres.get_by_id(1).await.expect_err("deleted");
        assert_eq!(err.messages(), ["Genre with id 1 does not exist"]);
    }
}
