//! Write-time validation.
//!
//! A [`Validator`] reads through the unit of work to check referential and
//! uniqueness constraints, and runs every applicable field rule. It never
//! stops at the first failure: the returned [`ValidationResult`] carries
//! every violation in the order the checks ran. A check that only makes
//! sense after an earlier one passed (e.g. splitting a full name that is
//! blank) is skipped instead.

mod auth;
mod author;
mod book;
mod genre;
mod user;

pub use auth::{AuthenticationValidator, SIGN_IN_FAILED};
pub use author::AuthorValidator;
pub use book::BookValidator;
pub use genre::GenreValidator;
pub use user::UserValidator;

use crate::entity::{EntityId, Identifiable};
use crate::error::{Error, Result};
use crate::repository::{Record, UnitOfWork};

/// Aggregated outcome of a validation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationResult {
    is_valid: bool,
    messages: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        ValidationResult {
            is_valid: true,
            messages: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Record a violation.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.is_valid = false;
        self.messages.push(message.into());
    }

    /// Append another result's violations after this one's.
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
            self.messages.extend(other.messages);
        }
    }

    /// `Ok(())` when valid, otherwise [`Error::ValidationFailed`].
    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(Error::ValidationFailed(self.messages))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

/// Rule set for one entity type.
///
/// Implementors provide the add-time rules and, where the entity has unique
/// fields, the update-time identity check. The update and id checks are
/// shared.
#[allow(async_fn_in_trait)]
pub trait Validator: Default + Send + Sync {
    type Model: Identifiable + Sync;
    type Record: Record;

    /// Every field, relation and (when `identity_check` is set) uniqueness
    /// rule for a candidate insert.
    async fn validate_for_add<U: UnitOfWork>(
        &self,
        uow: &U,
        model: &Self::Model,
        identity_check: bool,
    ) -> Result<ValidationResult>;

    /// Uniqueness against every row other than `current`, the stored state
    /// of the row being updated.
    async fn validate_identity<U: UnitOfWork>(
        &self,
        _uow: &U,
        _model: &Self::Model,
        _current: &Self::Record,
    ) -> Result<ValidationResult> {
        Ok(ValidationResult::valid())
    }

    /// Id presence and existence, identity excluding self, then every
    /// add-time rule without the insert-time uniqueness scan.
    async fn validate_for_update<U: UnitOfWork>(
        &self,
        uow: &U,
        model: &Self::Model,
    ) -> Result<ValidationResult> {
        let mut result = ValidationResult::valid();
        let id = model.id();

        if id == 0 {
            result.fail(format!("{} id cannot be empty", <Self::Record as Record>::KIND));
        } else {
            match <Self::Record as Record>::find(uow, id).await? {
                Some(current) => {
                    result.merge(self.validate_identity(uow, model, &current).await?);
                }
                None => result.fail(not_found(<Self::Record as Record>::KIND.name(), id)),
            }
        }

        result.merge(self.validate_for_add(uow, model, false).await?);
        Ok(result)
    }

    /// Fails with `"<Entity> with id <id> does not exist"` when absent.
    async fn validate_id<U: UnitOfWork>(&self, uow: &U, id: EntityId) -> Result<ValidationResult> {
        let mut result = ValidationResult::valid();
        if !<Self::Record as Record>::exists(uow, id).await? {
            result.fail(not_found(<Self::Record as Record>::KIND.name(), id));
        }
        Ok(result)
    }
}

pub(crate) fn not_found(entity: &str, id: EntityId) -> String {
    format!("{} with id {} does not exist", entity, id)
}

/// First violated bound among blank / too long / too short, if any.
///
/// Lengths count characters, not bytes.
pub(crate) fn text_violation(label: &str, value: &str, min: usize, max: usize) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{} cannot be empty", label));
    }
    let length = value.chars().count();
    if length > max {
        Some(format!("{} cannot be longer than {} characters", label, max))
    } else if length < min {
        Some(format!("{} cannot be shorter than {} characters", label, min))
    } else {
        None
    }
}

/// Full-name rule shared by authors and users: two tokens, 5..=100 chars.
pub(crate) fn full_name_violation(label: &str, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{} cannot be empty", label));
    }
    // Every separator counts: doubled or edge whitespace yields empty tokens.
    if value.split(char::is_whitespace).count() != 2 {
        return Some(format!("{} must contain first and last name", label));
    }
    text_violation(label, value, 5, 100)
}

/// Report every id in `ids` that has no live row of `R`.
pub(crate) async fn check_relations<R: Record, U: UnitOfWork>(
    uow: &U,
    ids: &[EntityId],
    result: &mut ValidationResult,
) -> Result<()> {
    for &id in ids {
        if !R::exists(uow, id).await? {
            result.fail(not_found(R::KIND.name(), id));
        }
    }
    Ok(())
}
