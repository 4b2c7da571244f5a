//! Capability traits that let one generic service drive every entity type.

use crate::error::Result;
use crate::repository::{Record, UnitOfWork};
use crate::validation::Validator;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Integer identity assigned by the persistence gateway on creation.
///
/// `0` is the "default" id: a DTO carrying it has not been persisted yet, and
/// relation fields holding it mean "no related row".
pub type EntityId = i64;

/// Anything that exposes its identity.
pub trait Identifiable {
    fn id(&self) -> EntityId;
}

/// Whether a record is being resolved for an insert or a replace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    Add,
    Update,
}

/// What the service prepared before opening the write session.
pub struct WriteContext<'a> {
    /// Digest of [`CatalogEntity::password`], when the model carries one.
    pub password_digest: Option<&'a str>,
    pub mode: WriteMode,
}

/// Trait implemented by every persisted record the catalog serves.
///
/// Ties a record to its DTO shape (what callers send and receive), its
/// validator, and the mapping in both directions.
///
/// # Example
///
/// ```ignore
/// impl CatalogEntity for Genre {
///     type Dto = GenreDto;
///     type Validator = GenreValidator;
///
///     fn to_dto(record: &Genre) -> GenreDto { ... }
///
///     async fn resolve<U: UnitOfWork>(uow: &U, model: &GenreDto, _ctx: &WriteContext<'_>) -> Result<Genre> {
///         // attach every related id to a live row before persisting
///     }
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait CatalogEntity: Record {
    /// Flattened shape exchanged with callers and stored in the cache.
    type Dto: Identifiable + Clone + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Rule set guarding writes of this entity type.
    type Validator: Validator<Model = Self::Dto, Record = Self>;

    /// Map a persisted record to its outward DTO shape.
    fn to_dto(record: &Self) -> Self::Dto;

    /// Shape of a caller-supplied model when it is echoed back.
    ///
    /// Used by `Add`, which returns the caller's input rather than the
    /// persisted row. Override to strip secrets.
    fn to_response(model: Self::Dto) -> Self::Dto {
        model
    }

    /// Plaintext secret to hash before the write session opens.
    fn password(_model: &Self::Dto) -> Option<&str> {
        None
    }

    /// Map a validated DTO to a record, resolving every relation id to a
    /// live related row through the unit of work.
    async fn resolve<U: UnitOfWork>(
        uow: &U,
        model: &Self::Dto,
        ctx: &WriteContext<'_>,
    ) -> Result<Self>;
}
