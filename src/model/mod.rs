//! Catalog records and their DTO shapes.
//!
//! Records are what the persistence gateway stores. DTOs are the flattened
//! shapes callers exchange with the services and what the cache holds:
//! a person's name travels as one `full_name`, relations travel as id lists,
//! and a relation id of `0` means "none".

mod author;
mod book;
mod genre;
mod user;

pub use author::{Author, AuthorDto};
pub use book::{Book, BookDto};
pub use genre::{Genre, GenreDto};
pub use user::{User, UserDto};

use crate::entity::EntityId;
use crate::error::{Error, Result};
use crate::repository::{Record, UnitOfWork};

/// Split a validated two-token full name into (given name, family name).
pub(crate) fn split_full_name(full_name: &str) -> (String, String) {
    let mut tokens = full_name.split_whitespace();
    let first = tokens.next().unwrap_or_default().to_string();
    let last = tokens.last().unwrap_or_default().to_string();
    (first, last)
}

pub(crate) fn join_full_name(first: &str, last: &str) -> String {
    format!("{} {}", first, last)
}

/// Map a relation id to an optional foreign key, checking the row is live.
pub(crate) async fn resolve_id<R: Record, U: UnitOfWork>(
    uow: &U,
    id: EntityId,
) -> Result<Option<EntityId>> {
    if id == 0 {
        return Ok(None);
    }
    resolve_ids::<R, U>(uow, &[id]).await.map(|ids| ids.first().copied())
}

/// Attach every id in `ids` to a live row of `R`.
pub(crate) async fn resolve_ids<R: Record, U: UnitOfWork>(
    uow: &U,
    ids: &[EntityId],
) -> Result<Vec<EntityId>> {
    let mut resolved = Vec::with_capacity(ids.len());
    for &id in ids {
        match R::find(uow, id).await? {
            Some(row) => resolved.push(row.id()),
            None => {
                return Err(Error::RepositoryError(format!(
                    "{} {} vanished before commit",
                    R::KIND,
                    id
                )))
            }
        }
    }
    Ok(resolved)
}
