//! # catalog-kit
//!
//! Cache-aside CRUD orchestration for a lending-library catalog (authors,
//! books, genres, users).
//!
//! ## Features
//!
//! - **One Generic Service:** [`EntityService`] drives every entity type through
//!   the same read, add, update and delete pipeline
//! - **Validated Writes:** referential and uniqueness rules run against the
//!   store before anything is persisted, and every violation is reported
//! - **Shared Cache:** list and detail reads are cached; any successful write
//!   resets the whole cache in O(1)
//! - **Serialized Writers:** a write holds its store session from validation
//!   to commit, so concurrent writers cannot both pass a uniqueness check
//! - **Storage Agnostic:** plug any storage in behind the
//!   [`Store`](repository::Store) / [`UnitOfWork`](repository::UnitOfWork) traits
//!
//! ## Quick Start
//!
//! ```ignore
//! use catalog_kit::{
//!     Catalog, Credentials, Pagination,
//!     backend::InMemoryBackend,
//!     model::GenreDto,
//!     repository::InMemoryStore,
//! };
//!
//! // 1. Build the catalog once and share it (Clone is cheap)
//! let catalog = Catalog::new(InMemoryStore::new(), InMemoryBackend::new());
//!
//! // 2. Write through a service; failures carry every violation
//! catalog.genres().add(GenreDto { name: "Drama".into(), ..Default::default() }).await?;
//!
//! // 3. Read through the cache
//! let first_page = catalog.genres().get_all(Pagination::new(1, 20)).await?;
//!
//! // 4. Sign in
//! let result = catalog.authentication().sign_in(&Credentials::new("jreader", "secret")).await?;
//! ```

#[macro_use]
extern crate log;

pub mod auth;
pub mod backend;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod entity;
pub mod error;
pub mod hasher;
pub mod key;
pub mod model;
pub mod observability;
pub mod pagination;
pub mod repository;
pub mod serialization;
pub mod service;
pub mod strategy;
pub mod validation;

// Re-exports for convenience
pub use auth::{AuthenticationResult, AuthenticationService, Credentials};
pub use backend::CacheBackend;
pub use cache::CacheGateway;
pub use catalog::Catalog;
pub use config::CatalogConfig;
pub use entity::{CatalogEntity, EntityId, Identifiable};
pub use error::{Error, Result};
pub use pagination::Pagination;
pub use repository::{Record, Repository, Store, UnitOfWork};
pub use service::EntityService;
pub use strategy::CacheStrategy;
pub use validation::{ValidationResult, Validator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
