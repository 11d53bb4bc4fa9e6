//! Pure stage functions: filter → sort → page
//!
//! Stages work on indices into the ingested collection, so every view is a
//! subset (filter), permutation (sort) or contiguous slice (page) of the
//! previous one by construction, and no stage touches the records themselves.

use crate::core::column::ColumnDescriptor;
use crate::core::field::{FieldValue, compare_values};
use crate::core::query::{FilterSet, PageState, SortDirection, SortState};
use crate::core::record::Record;
use std::ops::Range;

/// Normalize a raw search term the way the filter stage matches it
pub fn normalize_search(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Indices of rows that match the search term and every active filter,
/// in ingested order
///
/// The search term matches a row when at least one searchable column's
/// resolved value contains it (case-insensitively). Each active filter must
/// match its own column the same way. Absent values never match.
pub fn filter_indices<T: Record>(
    rows: &[T],
    columns: &[ColumnDescriptor<T>],
    search: &str,
    filters: &FilterSet,
) -> Vec<usize> {
    let needle = normalize_search(search);
    let searchable: Vec<&str> = columns
        .iter()
        .filter(|c| c.searchable)
        .map(|c| c.key.as_str())
        .collect();
    let column_needles = filters.needles();

    rows.iter()
        .enumerate()
        .filter(|(_, row)| {
            needle.is_empty()
                || searchable
                    .iter()
                    .any(|key| row.field(key).is_some_and(|v| v.contains_ci(&needle)))
        })
        .filter(|(_, row)| {
            column_needles
                .iter()
                .all(|(key, n)| row.field(key).is_some_and(|v| v.contains_ci(n)))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Reorder `indices` by the value at the active sort key
///
/// Passes through unchanged when the sort state is inactive. The sort is
/// stable, so rows with equal keys keep their filtered order in both
/// directions. Missing values sort last ascending and first descending.
pub fn sort_indices<T: Record>(rows: &[T], indices: &[usize], sort: &SortState) -> Vec<usize> {
    if !sort.is_active() {
        return indices.to_vec();
    }

    let mut keyed: Vec<(usize, Option<FieldValue>)> = indices
        .iter()
        .map(|&i| (i, rows[i].field(&sort.active).map(FieldValue::into_sort_key)))
        .collect();

    keyed.sort_by(|(_, a), (_, b)| {
        let ordering = compare_values(a.as_ref(), b.as_ref());
        match sort.direction {
            SortDirection::Desc => ordering.reverse(),
            _ => ordering,
        }
    });

    keyed.into_iter().map(|(i, _)| i).collect()
}

/// Window of the sorted view shown on the current page
///
/// Never panics: a page past the end yields an empty range. With pagination
/// off the window covers everything.
pub fn page_window(len: usize, page: PageState, paginate: bool) -> Range<usize> {
    if !paginate {
        return 0..len;
    }
    let start = page.offset().min(len);
    let end = start.saturating_add(page.page_size).min(len);
    start..end
}
