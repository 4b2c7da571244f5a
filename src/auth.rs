//! Sign-in against stored user credentials.

use crate::entity::CatalogEntity;
use crate::error::Result;
use crate::hasher::PasswordHasher;
use crate::model::{User, UserDto};
use crate::repository::{Record, Store};
use crate::validation::{AuthenticationValidator, SIGN_IN_FAILED};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Username and plaintext password submitted for sign-in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Outcome of a sign-in attempt.
///
/// A failed attempt is not an `Err`: it is a result with
/// `is_successful == false` and the generic message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResult {
    pub is_successful: bool,
    pub error_message: Option<String>,
    pub user: Option<UserDto>,
}

impl AuthenticationResult {
    fn success(user: UserDto) -> Self {
        AuthenticationResult {
            is_successful: true,
            error_message: None,
            user: Some(user),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        AuthenticationResult {
            is_successful: false,
            error_message: Some(message.into()),
            user: None,
        }
    }
}

pub struct AuthenticationService<S: Store> {
    store: S,
    validator: AuthenticationValidator,
}

impl<S: Store> AuthenticationService<S> {
    pub fn new(store: S, hasher: Arc<dyn PasswordHasher>) -> Self {
        AuthenticationService {
            store,
            validator: AuthenticationValidator::new(hasher),
        }
    }

    /// Check credentials and return the matching user without its password.
    ///
    /// # Errors
    ///
    /// Only store and hashing failures are errors; bad credentials yield an
    /// unsuccessful result.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<AuthenticationResult> {
        let session = self.store.read().await?;
        let user = User::find_all(&session)
            .await?
            .into_iter()
            .find(|user| user.username == credentials.username);
        drop(session);

        let validation = self
            .validator
            .validate_for_sign_in(user.as_ref(), credentials)
            .await?;
        match user {
            Some(user) if validation.is_valid() => {
                info!("User {} signed in", user.id);
                Ok(AuthenticationResult::success(User::to_dto(&user)))
            }
            _ => {
                warn!("Sign-in rejected for {:?}", credentials.username);
                Ok(AuthenticationResult::failure(SIGN_IN_FAILED))
            }
        }
    }
}
