use super::ValidationResult;
use crate::auth::Credentials;
use crate::error::Result;
use crate::hasher::{offload, PasswordHasher};
use crate::model::User;
use std::sync::Arc;

/// The only message a failed sign-in ever produces.
pub const SIGN_IN_FAILED: &str = "Username or password is incorrect";

/// Credential check for sign-in.
///
/// Blank fields, an unknown username and a wrong password all yield the
/// same single message.
#[derive(Clone)]
pub struct AuthenticationValidator {
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthenticationValidator {
    pub fn new(hasher: Arc<dyn PasswordHasher>) -> Self {
        AuthenticationValidator { hasher }
    }

    /// Check `credentials` against `user`, the row stored under the
    /// submitted username if there is one.
    ///
    /// Verification runs on the blocking pool; callers must not hold a store
    /// session across it.
    pub async fn validate_for_sign_in(
        &self,
        user: Option<&User>,
        credentials: &Credentials,
    ) -> Result<ValidationResult> {
        let blank =
            credentials.username.trim().is_empty() || credentials.password.trim().is_empty();
        let accepted = match user {
            Some(user) if !blank => {
                let password = credentials.password.clone();
                let digest = user.password_digest.clone();
                offload(&self.hasher, move |hasher| hasher.verify(&password, &digest)).await?
            }
            _ => false,
        };

        let mut result = ValidationResult::valid();
        if !accepted {
            result.fail(SIGN_IN_FAILED);
        }
        Ok(result)
    }
}
