//! Persistence gateway contracts.
//!
//! The catalog talks to storage through three traits:
//!
//! - [`Repository<T>`]: typed CRUD over one record table.
//! - [`UnitOfWork`]: a session bundling the four repositories plus a
//!   commit (`save`). Staged writes become visible only after `save`.
//! - [`Store`]: hands out a fresh session per operation. Read sessions run
//!   concurrently; write sessions are exclusive for their whole lifetime,
//!   which is how the services serialize validate-then-commit sequences.
//!
//! An in-memory implementation lives in [`inmemory`]. Plug in any other
//! storage (SQL pool, document store, ...) by implementing the same traits.
//!
//! # Implementing Store
//!
//! Return `Err` for infrastructure failures (lost connection, write attempted
//! on a read session). A missing row is `Ok(None)`, never an error.

pub mod inmemory;

use crate::entity::EntityId;
use crate::error::Result;
use crate::model::{Author, Book, Genre, User};
use std::fmt;

pub use inmemory::{InMemorySession, InMemoryStore};

/// Record tables known to the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Author,
    Book,
    Genre,
    User,
}

impl Kind {
    pub const ALL: [Kind; 4] = [Kind::Author, Kind::Book, Kind::Genre, Kind::User];

    /// Entity name used in cache keys and validation messages.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Author => "Author",
            Kind::Book => "Book",
            Kind::Genre => "Genre",
            Kind::User => "User",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed CRUD over a single record table.
#[allow(async_fn_in_trait)]
pub trait Repository<T: Record>: Send + Sync {
    /// Every row, ordered by id ascending.
    async fn get_all(&self) -> Result<Vec<T>>;

    /// Single row lookup. Missing rows are `Ok(None)`.
    async fn get_by_id(&self, id: EntityId) -> Result<Option<T>>;

    /// Stage an insert. The gateway assigns the id; the returned record
    /// carries it.
    async fn add(&mut self, record: T) -> Result<T>;

    /// Stage a full replace of an existing row, relation sets included.
    async fn update(&mut self, record: T) -> Result<T>;

    /// Stage a delete. Returns the row as it was, or `None` if absent.
    async fn delete_by_id(&mut self, id: EntityId) -> Result<Option<T>>;
}

/// A session over all four repositories with a single commit point.
#[allow(async_fn_in_trait)]
pub trait UnitOfWork:
    Repository<Author> + Repository<Book> + Repository<Genre> + Repository<User> + Send + Sync
{
    /// Commit every staged write atomically.
    async fn save(&mut self) -> Result<()>;
}

/// Factory for per-operation sessions.
#[allow(async_fn_in_trait)]
pub trait Store: Clone + Send + Sync + 'static {
    type Session: UnitOfWork;

    /// Open a shared, read-only session.
    async fn read(&self) -> Result<Self::Session>;

    /// Open an exclusive session that may stage writes and commit.
    ///
    /// Held until dropped; no other write or read session is handed out
    /// meanwhile.
    async fn write(&self) -> Result<Self::Session>;
}

/// A persisted row type.
///
/// Besides identity, `Record` dispatches to the matching `Repository<Self>`
/// of any unit of work, so generic code can write `Book::find(uow, id)`
/// instead of disambiguating between the four repository impls.
#[allow(async_fn_in_trait)]
pub trait Record: Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: Kind;

    fn id(&self) -> EntityId;

    fn set_id(&mut self, id: EntityId);

    async fn find<U: UnitOfWork>(uow: &U, id: EntityId) -> Result<Option<Self>>;

    async fn find_all<U: UnitOfWork>(uow: &U) -> Result<Vec<Self>>;

    async fn insert<U: UnitOfWork>(uow: &mut U, record: Self) -> Result<Self>;

    async fn replace<U: UnitOfWork>(uow: &mut U, record: Self) -> Result<Self>;

    async fn remove<U: UnitOfWork>(uow: &mut U, id: EntityId) -> Result<Option<Self>>;

    async fn exists<U: UnitOfWork>(uow: &U, id: EntityId) -> Result<bool> {
        Ok(Self::find(uow, id).await?.is_some())
    }
}

macro_rules! impl_record {
    ($($record:ident),+ $(,)?) => {$(
        impl Record for $record {
            const KIND: Kind = Kind::$record;

            fn id(&self) -> EntityId {
                self.id
            }

            fn set_id(&mut self, id: EntityId) {
                self.id = id;
            }

            async fn find<U: UnitOfWork>(uow: &U, id: EntityId) -> Result<Option<Self>> {
                <U as Repository<$record>>::get_by_id(uow, id).await
            }

            async fn find_all<U: UnitOfWork>(uow: &U) -> Result<Vec<Self>> {
                <U as Repository<$record>>::get_all(uow).await
            }

            async fn insert<U: UnitOfWork>(uow: &mut U, record: Self) -> Result<Self> {
                <U as Repository<$record>>::add(uow, record).await
            }

            async fn replace<U: UnitOfWork>(uow: &mut U, record: Self) -> Result<Self> {
                <U as Repository<$record>>::update(uow, record).await
            }

            async fn remove<U: UnitOfWork>(uow: &mut U, id: EntityId) -> Result<Option<Self>> {
                <U as Repository<$record>>::delete_by_id(uow, id).await
            }
        }
    )+};
}

impl_record!(Author, Book, Genre, User);
