use super::{join_full_name, resolve_ids, split_full_name, Book};
use crate::entity::{CatalogEntity, EntityId, Identifiable, WriteContext};
use crate::error::{Error, Result};
use crate::repository::UnitOfWork;
use crate::validation::AuthorValidator;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stored author row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Author {
    pub id: EntityId,
    pub first_name: String,
    pub surname: String,
    pub date_of_birth: NaiveDate,
    pub country: String,
    /// Derived from the books that reference this author.
    pub book_ids: Vec<EntityId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    #[serde(default)]
    pub id: EntityId,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub country: String,
    #[serde(default)]
    pub book_ids: Vec<EntityId>,
}

impl Identifiable for AuthorDto {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl CatalogEntity for Author {
    type Dto = AuthorDto;
    type Validator = AuthorValidator;

    fn to_dto(record: &Author) -> AuthorDto {
        AuthorDto {
            id: record.id,
            full_name: join_full_name(&record.first_name, &record.surname),
            date_of_birth: Some(record.date_of_birth),
            country: record.country.clone(),
            book_ids: record.book_ids.clone(),
        }
    }

    async fn resolve<U: UnitOfWork>(
        uow: &U,
        model: &AuthorDto,
        _ctx: &WriteContext<'_>,
    ) -> Result<Author> {
        let date_of_birth = model
            .date_of_birth
            .ok_or_else(|| Error::validation(["Author date of birth cannot be empty"]))?;
        let (first_name, surname) = split_full_name(&model.full_name);

        Ok(Author {
            id: model.id,
            first_name,
            surname,
            date_of_birth,
            country: model.country.clone(),
            book_ids: resolve_ids::<Book, U>(uow, &model.book_ids).await?,
        })
    }
}
