use super::{check_relations, ValidationResult, Validator};
use crate::error::Result;
use crate::model::{Book, Genre, GenreDto};
use crate::repository::{Record, UnitOfWork};

#[derive(Clone, Copy, Debug, Default)]
pub struct GenreValidator;

fn name_taken(name: &str) -> String {
    format!("Genre with name {} already exists", name)
}

impl Validator for GenreValidator {
    type Model = GenreDto;
    type Record = Genre;

    async fn validate_for_add<U: UnitOfWork>(
        &self,
        uow: &U,
        model: &GenreDto,
        identity_check: bool,
    ) -> Result<ValidationResult> {
        let mut result = ValidationResult::valid();

        if model.name.trim().is_empty() {
            result.fail("Genre name cannot be empty");
        } else if identity_check {
            let genres = Genre::find_all(uow).await?;
            if genres.iter().any(|genre| genre.name == model.name) {
                result.fail(name_taken(&model.name));
            }
        }

        if model.name.chars().count() > 50 {
            result.fail("Genre name cannot be longer than 50 characters");
        }

        check_relations::<Book, U>(uow, &model.book_ids, &mut result).await?;
        Ok(result)
    }

    async fn validate_identity<U: UnitOfWork>(
        &self,
        uow: &U,
        model: &GenreDto,
        current: &Genre,
    ) -> Result<ValidationResult> {
        let mut result = ValidationResult::valid();
        let genres = Genre::find_all(uow).await?;
        if genres
            .iter()
            .any(|genre| genre.id != current.id && genre.name == model.name)
        {
            result.fail(name_taken(&model.name));
        }
        Ok(result)
    }
}
