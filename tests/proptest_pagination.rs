//! Property-based tests for page selection.
//!
//! # Properties Tested
//!
//! 1. **Window Property**: a valid page is exactly `skip((n-1)*s).take(s)`
//! 2. **Fallback Property**: a missing or non-positive value returns everything
//! 3. **Partition Property**: walking pages 1.. visits every item once, in order
//! 4. **Key Property**: distinct paginations produce distinct cache keys

use catalog_kit::key::CacheKeyBuilder;
use catalog_kit::model::Book;
use catalog_kit::Pagination;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_valid_page_is_a_window(
        items in prop::collection::vec(any::<i64>(), 0..200),
        number in 1i32..50,
        size in 1i32..50,
    ) {
        let page = Pagination::new(number, size).apply(items.clone());
        let skip = (number as usize - 1) * size as usize;
        let expected: Vec<i64> = items.iter().copied().skip(skip).take(size as usize).collect();
        prop_assert_eq!(page, expected);
    }

    #[test]
    fn prop_invalid_page_returns_everything(
        items in prop::collection::vec(any::<i64>(), 0..100),
        number in prop::option::of(-5i32..=0),
        size in prop::option::of(-5i32..50),
    ) {
        let pagination = Pagination { page_number: number, page_size: size };
        prop_assert_eq!(pagination.apply(items.clone()), items);
    }

    #[test]
    fn prop_pages_partition_the_list(
        items in prop::collection::vec(any::<i64>(), 0..200),
        size in 1i32..30,
    ) {
        let mut walked = Vec::new();
        let mut number = 1;
        loop {
            let page = Pagination::new(number, size).apply(items.clone());
            if page.is_empty() {
                break;
            }
            prop_assert!(page.len() <= size as usize);
            walked.extend(page);
            number += 1;
        }
        prop_assert_eq!(walked, items);
    }

    #[test]
    fn prop_page_keys_are_distinct(
        a in (prop::option::of(-3i32..20), prop::option::of(-3i32..20)),
        b in (prop::option::of(-3i32..20), prop::option::of(-3i32..20)),
    ) {
        let first = Pagination { page_number: a.0, page_size: a.1 };
        let second = Pagination { page_number: b.0, page_size: b.1 };
        let same_key = CacheKeyBuilder::page::<Book>(&first) == CacheKeyBuilder::page::<Book>(&second);
        prop_assert_eq!(same_key, first == second);
    }
}
