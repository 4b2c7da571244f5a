use super::{check_relations, full_name_violation, text_violation, ValidationResult, Validator};
use crate::error::Result;
use crate::model::{Book, User, UserDto};
use crate::repository::{Record, UnitOfWork};
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_PICTURE_BYTES: usize = 10_000_000;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\w\.\-]+)@([\w\-]+)((\.(\w){2,3})+)$").expect("Invalid email regex")
});

fn username_taken(username: &str) -> String {
    format!("User with username {} already exists", username)
}

fn email_taken(email: &str) -> String {
    format!("User with email {} already exists", email)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct UserValidator;

impl Validator for UserValidator {
    type Model = UserDto;
    type Record = User;

    async fn validate_for_add<U: UnitOfWork>(
        &self,
        uow: &U,
        model: &UserDto,
        identity_check: bool,
    ) -> Result<ValidationResult> {
        let mut result = ValidationResult::valid();
        let users = if identity_check {
            User::find_all(uow).await?
        } else {
            Vec::new()
        };

        if let Some(message) = text_violation("User username", &model.username, 5, 50) {
            result.fail(message);
        } else if users.iter().any(|user| user.username == model.username) {
            result.fail(username_taken(&model.username));
        }

        if let Some(message) = text_violation("User password", &model.password, 5, 50) {
            result.fail(message);
        }

        if let Some(message) = full_name_violation("User full name", &model.full_name) {
            result.fail(message);
        }

        if let Some(message) = text_violation("User email", &model.email, 5, 50) {
            result.fail(message);
        } else if !EMAIL_PATTERN.is_match(&model.email) {
            result.fail("User email is not in valid format");
        } else if users.iter().any(|user| user.email == model.email) {
            result.fail(email_taken(&model.email));
        }

        check_relations::<Book, U>(uow, &model.book_ids, &mut result).await?;

        match &model.profile_picture {
            None => result.fail("User profile picture cannot be empty"),
            Some(picture) if picture.len() > MAX_PICTURE_BYTES => {
                result.fail("User profile picture cannot be larger than 10MB")
            }
            Some(_) => {}
        }

        Ok(result)
    }

    async fn validate_identity<U: UnitOfWork>(
        &self,
        uow: &U,
        model: &UserDto,
        current: &User,
    ) -> Result<ValidationResult> {
        let mut result = ValidationResult::valid();
        let others: Vec<User> = User::find_all(uow)
            .await?
            .into_iter()
            .filter(|user| user.id != current.id)
            .collect();

        if others.iter().any(|user| user.username == model.username) {
            result.fail(username_taken(&model.username));
        }
        if others.iter().any(|user| user.email == model.email) {
            result.fail(email_taken(&model.email));
        }
        Ok(result)
    }
}
