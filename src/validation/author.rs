use super::{check_relations, full_name_violation, ValidationResult, Validator};
use crate::error::Result;
use crate::model::{Author, AuthorDto, Book};
use crate::repository::UnitOfWork;
use chrono::Utc;

#[derive(Clone, Copy, Debug, Default)]
pub struct AuthorValidator;

impl Validator for AuthorValidator {
    type Model = AuthorDto;
    type Record = Author;

    async fn validate_for_add<U: UnitOfWork>(
        &self,
        uow: &U,
        model: &AuthorDto,
        _identity_check: bool,
    ) -> Result<ValidationResult> {
        let mut result = ValidationResult::valid();

        if let Some(message) = full_name_violation("Author full name", &model.full_name) {
            result.fail(message);
        }

        match model.date_of_birth {
            None => result.fail("Author date of birth cannot be empty"),
            Some(date) if date > Utc::now().date_naive() => {
                result.fail("Author date of birth cannot be in the future")
            }
            Some(_) => {}
        }

        if model.country.trim().is_empty() {
            result.fail("Author country cannot be empty");
        }

        check_relations::<Book, U>(uow, &model.book_ids, &mut result).await?;
        Ok(result)
    }
}
