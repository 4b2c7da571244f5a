use super::{join_full_name, resolve_ids, split_full_name, Book};
use crate::entity::{CatalogEntity, EntityId, Identifiable, WriteContext, WriteMode};
use crate::error::{Error, Result};
use crate::repository::{Record, UnitOfWork};
use crate::validation::UserValidator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored user row. Only a salted password digest is kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password_digest: String,
    pub registered_at: DateTime<Utc>,
    pub profile_picture: Vec<u8>,
    /// Books on the user's shelf.
    pub book_ids: Vec<EntityId>,
}

/// User DTO.
///
/// `password` carries plaintext inbound only; every outbound shape has it
/// empty. `registered_at` is read-only and ignored on writes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(default)]
    pub id: EntityId,
    pub full_name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub profile_picture: Option<Vec<u8>>,
    #[serde(default)]
    pub registered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub book_ids: Vec<EntityId>,
}

impl Identifiable for UserDto {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl CatalogEntity for User {
    type Dto = UserDto;
    type Validator = UserValidator;

    fn to_dto(record: &User) -> UserDto {
        UserDto {
            id: record.id,
            full_name: join_full_name(&record.first_name, &record.last_name),
            username: record.username.clone(),
            email: record.email.clone(),
            password: String::new(),
            profile_picture: Some(record.profile_picture.clone()),
            registered_at: Some(record.registered_at),
            book_ids: record.book_ids.clone(),
        }
    }

    fn to_response(mut model: UserDto) -> UserDto {
        model.password.clear();
        model
    }

    fn password(model: &UserDto) -> Option<&str> {
        Some(&model.password)
    }

    async fn resolve<U: UnitOfWork>(
        uow: &U,
        model: &UserDto,
        ctx: &WriteContext<'_>,
    ) -> Result<User> {
        let registered_at = match ctx.mode {
            WriteMode::Add => Utc::now(),
            WriteMode::Update => User::find(uow, model.id)
                .await?
                .map(|current| current.registered_at)
                .unwrap_or_else(Utc::now),
        };
        let password_digest = ctx
            .password_digest
            .ok_or_else(|| Error::HashingError("password digest was not prepared".to_string()))?;
        let (first_name, last_name) = split_full_name(&model.full_name);

        Ok(User {
            id: model.id,
            first_name,
            last_name,
            username: model.username.clone(),
            email: model.email.clone(),
            password_digest: password_digest.to_string(),
            registered_at,
            profile_picture: model.profile_picture.clone().unwrap_or_default(),
            book_ids: resolve_ids::<Book, U>(uow, &model.book_ids).await?,
        })
    }
}
