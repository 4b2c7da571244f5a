use super::{resolve_ids, Book};
use crate::entity::{CatalogEntity, EntityId, Identifiable, WriteContext};
use crate::error::Result;
use crate::repository::UnitOfWork;
use crate::validation::GenreValidator;
use serde::{Deserialize, Serialize};

/// Stored genre row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Genre {
    pub id: EntityId,
    pub name: String,
    /// Derived from the books that reference this genre.
    pub book_ids: Vec<EntityId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreDto {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub book_ids: Vec<EntityId>,
}

impl Identifiable for GenreDto {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl CatalogEntity for Genre {
    type Dto = GenreDto;
    type Validator = GenreValidator;

    fn to_dto(record: &Genre) -> GenreDto {
        GenreDto {
            id: record.id,
            name: record.name.clone(),
            book_ids: record.book_ids.clone(),
        }
    }

    async fn resolve<U: UnitOfWork>(
        uow: &U,
        model: &GenreDto,
        _ctx: &WriteContext<'_>,
    ) -> Result<Genre> {
        Ok(Genre {
            id: model.id,
            name: model.name.clone(),
            book_ids: resolve_ids::<Book, U>(uow, &model.book_ids).await?,
        })
    }
}
