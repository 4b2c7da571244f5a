//! Cache key management utilities.
//!
//! Keys are namespaced by entity name so list and detail reads of different
//! types never collide:
//!
//! - list reads: `"{Entity}:page:{page_number}:{page_size}"`
//! - detail reads: `"{Entity}:id:{id}"`

use crate::entity::EntityId;
use crate::pagination::Pagination;
use crate::repository::Record;

/// Builder for cache keys.
pub struct CacheKeyBuilder;

impl CacheKeyBuilder {
    /// Key of one page (or the full list) of `T`.
    pub fn page<T: Record>(pagination: &Pagination) -> String {
        format!("{}:page:{}", T::KIND, pagination)
    }

    /// Key of a single `T` by id.
    pub fn id<T: Record>(id: EntityId) -> String {
        format!("{}:id:{}", T::KIND, id)
    }
}
