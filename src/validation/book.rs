use super::{check_relations, not_found, text_violation, ValidationResult, Validator};
use crate::error::Result;
use crate::model::{Author, Book, BookDto, Genre, User};
use crate::repository::{Record, UnitOfWork};
use chrono::{Datelike, Utc};

const MAX_CONTENT_BYTES: usize = 1_000_000;

#[derive(Clone, Copy, Debug, Default)]
pub struct BookValidator;

impl Validator for BookValidator {
    type Model = BookDto;
    type Record = Book;

    async fn validate_for_add<U: UnitOfWork>(
        &self,
        uow: &U,
        model: &BookDto,
        _identity_check: bool,
    ) -> Result<ValidationResult> {
        let mut result = ValidationResult::valid();

        if let Some(message) = text_violation("Book title", &model.title, 2, 100) {
            result.fail(message);
        }

        if model.author_id != 0 && !Author::exists(uow, model.author_id).await? {
            result.fail(not_found("Author", model.author_id));
        }

        if model.genre_id == 0 {
            result.fail("Genre id cannot be empty");
        } else if !Genre::exists(uow, model.genre_id).await? {
            result.fail(not_found("Genre", model.genre_id));
        }

        if model.year == 0 {
            result.fail("Publication year cannot be empty");
        } else if model.year < 0 {
            result.fail("Publication year cannot be negative");
        } else if model.year > Utc::now().year() {
            result.fail("Publication year cannot be greater than current year");
        }

        if let Some(message) = text_violation("Book description", &model.description, 10, 1000) {
            result.fail(message);
        }

        match &model.content {
            None => result.fail("Book content cannot be empty"),
            Some(content) if content.len() > MAX_CONTENT_BYTES => {
                result.fail("Book content cannot be longer than 1MB")
            }
            Some(_) => {}
        }

        check_relations::<User, U>(uow, &model.user_ids, &mut result).await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryStore, Store};

    async fn store_with_genre() -> InMemoryStore {
        let store = InMemoryStore::new();
        let mut session = store.write().await.expect("Failed to open session");
        Genre::insert(
            &mut session,
            Genre {
                id: 0,
                name: "Drama".to_string(),
                book_ids: Vec::new(),
            },
        )
        .await
        .expect("Failed to add genre");
        session.save().await.expect("Failed to save");
        store
    }

    fn model() -> BookDto {
        BookDto {
            id: 0,
            title: "Emma".to_string(),
            description: "A novel of manners".to_string(),
            year: 1815,
            content: Some(Vec::new()),
            author_id: 0,
            genre_id: 1,
            user_ids: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_valid_book_without_author() {
        let store = store_with_genre().await;
        let session = store.read().await.expect("Failed to open session");

        let result = BookValidator
            .validate_for_add(&session, &model(), true)
            .await
            .expect("Failed to validate");
        assert!(result.is_valid(), "{:?}", result.messages());
    }

    #[tokio::test]
    async fn test_year_rules() {
        let store = store_with_genre().await;
        let session = store.read().await.expect("Failed to open session");

        for (year, message) in [
            (0, "Publication year cannot be empty"),
            (-5, "Publication year cannot be negative"),
            (Utc::now().year() + 1, "Publication year cannot be greater than current year"),
        ] {
            let candidate = BookDto { year, ..model() };
            let result = BookValidator
                .validate_for_add(&session, &candidate, true)
                .await
                .expect("Failed to validate");
            assert_eq!(result.messages(), [message]);
        }
    }

    #[tokio::test]
    async fn test_missing_relations_and_payload() {
        let store = store_with_genre().await;
        let session = store.read().await.expect("Failed to open session");
        let candidate = BookDto {
            author_id: 999,
            genre_id: 0,
            content: None,
            user_ids: vec![3],
            ..model()
        };

        let result = BookValidator
            .validate_for_add(&session, &candidate, true)
            .await
            .expect("Failed to validate");
        assert_eq!(
            result.messages(),
            [
                "Author with id 999 does not exist",
                "Genre id cannot be empty",
                "Book content cannot be empty",
                "User with id 3 does not exist",
            ]
        );
    }

    #[tokio::test]
    async fn test_oversized_content() {
        let store = store_with_genre().await;
        let session = store.read().await.expect("Failed to open session");
        let candidate = BookDto {
            content: Some(vec![0; MAX_CONTENT_BYTES + 1]),
            ..model()
        };

        let result = BookValidator
            .validate_for_add(&session, &candidate, true)
            .await
            .expect("Failed to validate");
        assert_eq!(result.messages(), ["Book content cannot be longer than 1MB"]);
    }
}
