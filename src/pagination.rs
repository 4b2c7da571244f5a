//! Page selection for list reads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Optional 1-based page number and page size.
///
/// Paging applies only when both values are present and positive; any other
/// combination returns the full list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_number: Option<i32>,
    pub page_size: Option<i32>,
}

impl Pagination {
    pub fn new(page_number: i32, page_size: i32) -> Self {
        Pagination {
            page_number: Some(page_number),
            page_size: Some(page_size),
        }
    }

    /// No paging: the full list.
    pub fn all() -> Self {
        Self::default()
    }

    /// `(skip, take)` when paging applies.
    pub fn window(&self) -> Option<(usize, usize)> {
        match (self.page_number, self.page_size) {
            (Some(number), Some(size)) if number > 0 && size > 0 => {
                let size = size as usize;
                Some(((number as usize - 1).saturating_mul(size), size))
            }
            _ => None,
        }
    }

    /// Select this page out of an ordered list.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        match self.window() {
            Some((skip, take)) => items.into_iter().skip(skip).take(take).collect(),
            None => items,
        }
    }
}

/// Cache-key token: `"{page_number}:{page_size}"`, absent values as `none`.
impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn part(value: Option<i32>) -> String {
            value.map_or_else(|| "none".to_string(), |v| v.to_string())
        }
        write!(f, "{}:{}", part(self.page_number), part(self.page_size))
    }
}
