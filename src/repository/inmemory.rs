//! In-memory persistence gateway.
//!
//! Tables live behind one `tokio::sync::RwLock`. A session owns a guard for
//! its whole lifetime: read sessions share the lock, write sessions hold it
//! exclusively. Writes are staged on the session and applied to the tables
//! on `save`; dropping a session without saving discards them.
//!
//! Relation sets are stored once and derived on read:
//! - author and genre `book_ids` come from each book's foreign keys,
//! - book `user_ids` and user `book_ids` come from the shelf link table.
//!
//! Writing a record replaces its relation set wholesale. A book requires its
//! author and genre, so deleting either one deletes their books as well.
//! Deleting a book or user drops its shelf links.

use super::{Kind, Record, Repository, Store, UnitOfWork};
use crate::entity::EntityId;
use crate::error::{Error, Result};
use crate::model::{Author, Book, Genre, User};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

#[derive(Debug, Default)]
struct Tables {
    authors: BTreeMap<EntityId, Author>,
    books: BTreeMap<EntityId, Book>,
    genres: BTreeMap<EntityId, Genre>,
    users: BTreeMap<EntityId, User>,
    /// (book id, user id)
    shelves: BTreeSet<(EntityId, EntityId)>,
    /// Last id handed out, per table.
    last_ids: [EntityId; 4],
}

type Change = Box<dyn FnOnce(&mut Tables) + Send + Sync>;

#[derive(Default)]
struct Shared {
    tables: Arc<RwLock<Tables>>,
    scans: [AtomicUsize; 4],
}

/// Thread-safe in-memory store. Cloning shares the same tables.
///
/// Also counts full-table reads per record kind, which lets callers observe
/// whether a read was served by the cache or reached storage.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    shared: Arc<Shared>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get_all` calls served for `kind` since creation or the
    /// last [`reset_scan_counters`](Self::reset_scan_counters).
    pub fn full_scans(&self, kind: Kind) -> usize {
        self.shared.scans[kind.index()].load(Ordering::SeqCst)
    }

    pub fn reset_scan_counters(&self) {
        for counter in &self.shared.scans {
            counter.store(0, Ordering::SeqCst);
        }
    }
}

impl Store for InMemoryStore {
    type Session = InMemorySession;

    async fn read(&self) -> Result<InMemorySession> {
        let guard = self.shared.tables.clone().read_owned().await;
        Ok(InMemorySession::open(self.shared.clone(), Guard::Read(guard)))
    }

    async fn write(&self) -> Result<InMemorySession> {
        let guard = self.shared.tables.clone().write_owned().await;
        Ok(InMemorySession::open(self.shared.clone(), Guard::Write(guard)))
    }
}

enum Guard {
    Read(OwnedRwLockReadGuard<Tables>),
    Write(OwnedRwLockWriteGuard<Tables>),
}

/// Unit of work over an [`InMemoryStore`].
pub struct InMemorySession {
    shared: Arc<Shared>,
    guard: Guard,
    pending: Vec<Change>,
    last_ids: [EntityId; 4],
}

impl InMemorySession {
    fn open(shared: Arc<Shared>, guard: Guard) -> Self {
        let mut session = InMemorySession {
            shared,
            guard,
            pending: Vec::new(),
            last_ids: [0; 4],
        };
        session.last_ids = session.tables().last_ids;
        session
    }

    fn tables(&self) -> &Tables {
        match &self.guard {
            Guard::Read(guard) => &**guard,
            Guard::Write(guard) => &**guard,
        }
    }

    fn ensure_writable(&self, kind: Kind) -> Result<()> {
        match self.guard {
            Guard::Write(_) => Ok(()),
            Guard::Read(_) => Err(Error::RepositoryError(format!(
                "cannot write {} rows through a read-only session",
                kind
            ))),
        }
    }

    fn scan<T: Stored>(&self) -> Vec<T> {
        self.shared.scans[T::KIND.index()].fetch_add(1, Ordering::SeqCst);
        let tables = self.tables();
        T::rows(tables)
            .values()
            .map(|row| row.hydrated(tables))
            .collect()
    }

    fn lookup<T: Stored>(&self, id: EntityId) -> Option<T> {
        let tables = self.tables();
        T::rows(tables).get(&id).map(|row| row.hydrated(tables))
    }

    fn stage_insert<T: Stored>(&mut self, mut record: T) -> Result<T> {
        self.ensure_writable(T::KIND)?;
        let last = &mut self.last_ids[T::KIND.index()];
        *last += 1;
        record.set_id(*last);

        let row = record.clone();
        self.pending
            .push(Box::new(move |tables: &mut Tables| row.put(tables)));
        Ok(record)
    }

    fn stage_update<T: Stored>(&mut self, record: T) -> Result<T> {
        self.ensure_writable(T::KIND)?;
        if !T::rows(self.tables()).contains_key(&record.id()) {
            return Err(Error::RepositoryError(format!(
                "{} {} is not stored",
                T::KIND,
                record.id()
            )));
        }

        let row = record.clone();
        self.pending
            .push(Box::new(move |tables: &mut Tables| row.put(tables)));
        Ok(record)
    }

    fn stage_delete<T: Stored>(&mut self, id: EntityId) -> Result<Option<T>> {
        self.ensure_writable(T::KIND)?;
        let existing = self.lookup::<T>(id);
        if existing.is_some() {
            self.pending
                .push(Box::new(move |tables: &mut Tables| T::purge(id, tables)));
        }
        Ok(existing)
    }
}

impl UnitOfWork for InMemorySession {
    async fn save(&mut self) -> Result<()> {
        let Guard::Write(guard) = &mut self.guard else {
            return Err(Error::RepositoryError(
                "cannot save a read-only session".to_string(),
            ));
        };

        let tables: &mut Tables = guard;
        let staged = self.pending.len();
        for change in self.pending.drain(..) {
            change(tables);
        }
        tables.last_ids = self.last_ids;

        debug!("Committed {} staged change(s)", staged);
        Ok(())
    }
}

macro_rules! table_repository {
    ($($record:ty),+ $(,)?) => {$(
        impl Repository<$record> for InMemorySession {
            async fn get_all(&self) -> Result<Vec<$record>> {
                Ok(self.scan::<$record>())
            }

            async fn get_by_id(&self, id: EntityId) -> Result<Option<$record>> {
                Ok(self.lookup::<$record>(id))
            }

            async fn add(&mut self, record: $record) -> Result<$record> {
                self.stage_insert(record)
            }

            async fn update(&mut self, record: $record) -> Result<$record> {
                self.stage_update(record)
            }

            async fn delete_by_id(&mut self, id: EntityId) -> Result<Option<$record>> {
                self.stage_delete::<$record>(id)
            }
        }
    )+};
}

table_repository!(Author, Book, Genre, User);

/// Table plumbing for one record kind.
trait Stored: Record {
    fn rows(tables: &Tables) -> &BTreeMap<EntityId, Self>;

    /// Copy of the row with derived relation ids filled in.
    fn hydrated(&self, tables: &Tables) -> Self;

    /// Upsert the row and rewire the relations it owns.
    fn put(self, tables: &mut Tables);

    /// Remove the row and every reference to it.
    fn purge(id: EntityId, tables: &mut Tables);
}

/// Point every listed book at `parent_id` and detach the ones no longer listed.
fn reparent(books: &mut BTreeMap<EntityId, Book>, parent: Kind, parent_id: EntityId, owned: &[EntityId]) {
    for book in books.values_mut() {
        let listed = owned.contains(&book.id);
        let slot = match parent {
            Kind::Genre => &mut book.genre_id,
            _ => &mut book.author_id,
        };
        if listed {
            *slot = Some(parent_id);
        } else if *slot == Some(parent_id) {
            *slot = None;
        }
    }
}

/// Delete every book matching `owned_by`, shelf links included.
fn cascade_books(tables: &mut Tables, owned_by: impl Fn(&Book) -> bool) {
    let doomed: Vec<EntityId> = tables
        .books
        .values()
        .filter(|book| owned_by(book))
        .map(|book| book.id)
        .collect();
    for id in doomed {
        Book::purge(id, tables);
    }
}

impl Stored for Author {
    fn rows(tables: &Tables) -> &BTreeMap<EntityId, Self> {
        &tables.authors
    }

    fn hydrated(&self, tables: &Tables) -> Self {
        let mut author = self.clone();
        author.book_ids = tables
            .books
            .values()
            .filter(|book| book.author_id == Some(self.id))
            .map(|book| book.id)
            .collect();
        author
    }

    fn put(mut self, tables: &mut Tables) {
        let owned = std::mem::take(&mut self.book_ids);
        reparent(&mut tables.books, Kind::Author, self.id, &owned);
        tables.authors.insert(self.id, self);
    }

    fn purge(id: EntityId, tables: &mut Tables) {
        tables.authors.remove(&id);
        cascade_books(tables, |book| book.author_id == Some(id));
    }
}

impl Stored for Genre {
    fn rows(tables: &Tables) -> &BTreeMap<EntityId, Self> {
        &tables.genres
    }

    fn hydrated(&self, tables: &Tables) -> Self {
        let mut genre = self.clone();
        genre.book_ids = tables
            .books
            .values()
            .filter(|book| book.genre_id == Some(self.id))
            .map(|book| book.id)
            .collect();
        genre
    }

    fn put(mut self, tables: &mut Tables) {
        let owned = std::mem::take(&mut self.book_ids);
        reparent(&mut tables.books, Kind::Genre, self.id, &owned);
        tables.genres.insert(self.id, self);
    }

    fn purge(id: EntityId, tables: &mut Tables) {
        tables.genres.remove(&id);
        cascade_books(tables, |book| book.genre_id == Some(id));
    }
}

impl Stored for Book {
    fn rows(tables: &Tables) -> &BTreeMap<EntityId, Self> {
        &tables.books
    }

    fn hydrated(&self, tables: &Tables) -> Self {
        let mut book = self.clone();
        book.user_ids = tables
            .shelves
            .range((self.id, EntityId::MIN)..=(self.id, EntityId::MAX))
            .map(|&(_, user_id)| user_id)
            .collect();
        book
    }

    fn put(mut self, tables: &mut Tables) {
        let id = self.id;
        let readers = std::mem::take(&mut self.user_ids);
        tables.shelves.retain(|&(book_id, _)| book_id != id);
        for user_id in readers {
            if tables.users.contains_key(&user_id) {
                tables.shelves.insert((id, user_id));
            }
        }
        tables.books.insert(id, self);
    }

    fn purge(id: EntityId, tables: &mut Tables) {
        tables.books.remove(&id);
        tables.shelves.retain(|&(book_id, _)| book_id != id);
    }
}

impl Stored for User {
    fn rows(tables: &Tables) -> &BTreeMap<EntityId, Self> {
        &tables.users
    }

    fn hydrated(&self, tables: &Tables) -> Self {
        let mut user = self.clone();
        user.book_ids = tables
            .shelves
            .iter()
            .filter(|&&(_, user_id)| user_id == self.id)
            .map(|&(book_id, _)| book_id)
            .collect();
        user
    }

    fn put(mut self, tables: &mut Tables) {
        let id = self.id;
        let shelf = std::mem::take(&mut self.book_ids);
        tables.shelves.retain(|&(_, user_id)| user_id != id);
        for book_id in shelf {
            if tables.books.contains_key(&book_id) {
                tables.shelves.insert((book_id, id));
            }
        }
        tables.users.insert(id, self);
    }

    fn purge(id: EntityId, tables: &mut Tables) {
        tables.users.remove(&id);
        tables.shelves.retain(|&(_, user_id)| user_id != id);
    }
}
