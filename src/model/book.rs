use super::{resolve_id, resolve_ids, Author, Genre, User};
use crate::entity::{CatalogEntity, EntityId, Identifiable, WriteContext};
use crate::error::Result;
use crate::repository::UnitOfWork;
use crate::validation::BookValidator;
use serde::{Deserialize, Serialize};

/// Stored book row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Book {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub year: i32,
    pub content: Vec<u8>,
    pub author_id: Option<EntityId>,
    pub genre_id: Option<EntityId>,
    /// Users holding this book on their shelf.
    pub user_ids: Vec<EntityId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    #[serde(default)]
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub year: i32,
    #[serde(default)]
    pub content: Option<Vec<u8>>,
    /// `0` when the book has no author.
    #[serde(default)]
    pub author_id: EntityId,
    /// `0` when the book has no genre.
    #[serde(default)]
    pub genre_id: EntityId,
    #[serde(default)]
    pub user_ids: Vec<EntityId>,
}

impl Identifiable for BookDto {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl CatalogEntity for Book {
    type Dto = BookDto;
    type Validator = BookValidator;

    fn to_dto(record: &Book) -> BookDto {
        BookDto {
            id: record.id,
            title: record.title.clone(),
            description: record.description.clone(),
            year: record.year,
            content: Some(record.content.clone()),
            author_id: record.author_id.unwrap_or_default(),
            genre_id: record.genre_id.unwrap_or_default(),
            user_ids: record.user_ids.clone(),
        }
    }

    async fn resolve<U: UnitOfWork>(
        uow: &U,
        model: &BookDto,
        _ctx: &WriteContext<'_>,
    ) -> Result<Book> {
        Ok(Book {
            id: model.id,
            title: model.title.clone(),
            description: model.description.clone(),
            year: model.year,
            content: model.content.clone().unwrap_or_default(),
            author_id: resolve_id::<Author, U>(uow, model.author_id).await?,
            genre_id: resolve_id::<Genre, U>(uow, model.genre_id).await?,
            user_ids: resolve_ids::<User, U>(uow, &model.user_ids).await?,
        })
    }
}
