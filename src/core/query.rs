//! Sort, page and filter state

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Direction of the active sort
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
    #[default]
    None,
}

/// Single active sort key and direction
///
/// # Format
/// - `field:asc` or `field` (ascending)
/// - `field:desc` (descending)
///
/// ```
/// # use data_table::core::query::{SortDirection, SortState};
/// let sort = SortState::parse("lastVisit:desc");
/// assert_eq!(sort.active, "lastVisit");
/// assert_eq!(sort.direction, SortDirection::Desc);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    /// Column key being sorted on, empty when unsorted
    pub active: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(active: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            active: active.into(),
            direction,
        }
    }

    pub fn asc(active: impl Into<String>) -> Self {
        Self::new(active, SortDirection::Asc)
    }

    pub fn desc(active: impl Into<String>) -> Self {
        Self::new(active, SortDirection::Desc)
    }

    /// Parse the `field[:asc|:desc]` shorthand. Unknown directions read as ascending.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::default();
        }
        match raw.rsplit_once(':') {
            Some((field, dir)) if dir.eq_ignore_ascii_case("desc") => Self::desc(field),
            Some((field, _)) => Self::asc(field),
            None => Self::asc(raw),
        }
    }

    /// Whether the sort stage does anything with this state
    pub fn is_active(&self) -> bool {
        !self.active.is_empty() && self.direction != SortDirection::None
    }

    /// Next state after the user activates the header of `key`
    ///
    /// A new column starts ascending; the same column cycles
    /// ascending → descending → unsorted.
    pub fn cycle(&self, key: &str) -> Self {
        if self.active != key {
            return Self::asc(key);
        }
        match self.direction {
            SortDirection::None => Self::asc(key),
            SortDirection::Asc => Self::desc(key),
            SortDirection::Desc => Self::default(),
        }
    }
}

/// Current page window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageState {
    /// Zero-based page index
    pub page_index: usize,
    /// Rows per page, always at least 1
    pub page_size: usize,
}

impl PageState {
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size: page_size.max(1),
        }
    }

    /// Index of the first row of this page in the sorted view
    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }

    /// Last valid page index for `total` rows (0 when there are none)
    pub fn last_page_index(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).saturating_sub(1)
    }

    /// This state with the page index pulled back into range for `total` rows
    pub fn clamped(&self, total: usize) -> Self {
        Self {
            page_index: self.page_index.min(self.last_page_index(total)),
            page_size: self.page_size,
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(0, 10)
    }
}

/// Pagination metadata for a result summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page index (starts at 0)
    pub page_index: usize,

    /// Number of rows per page
    pub page_size: usize,

    /// Total number of rows (after search and filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,

    /// One-based number of the first row shown, 0 when nothing is shown
    pub start_record: usize,

    /// One-based number of the last row shown
    pub end_record: usize,
}

impl PaginationMeta {
    pub fn new(page: PageState, total: usize) -> Self {
        let limit = page.page_size.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = page.offset();
        let end_record = start.saturating_add(limit).min(total);

        Self {
            page_index: page.page_index,
            page_size: limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page.page_index > 0,
            start_record: if start < total { start + 1 } else { 0 },
            end_record,
        }
    }
}

/// Active column filters keyed by column path
///
/// Entries whose value is null or an empty string are kept (the host may
/// still display them) but are inert: they never narrow the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    entries: IndexMap<String, Value>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter for `key`; returns whether anything changed
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if self.entries.get(&key) == Some(&value) {
            return false;
        }
        self.entries.insert(key, value);
        true
    }

    /// Remove the filter for `key`; returns whether it existed
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    /// Drop every entry; returns whether there was any
    pub fn clear(&mut self) -> bool {
        let had_entries = !self.entries.is_empty();
        self.entries.clear();
        had_entries
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a filter value narrows the result at all
    pub fn is_inert(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Active (non-inert) entries in insertion order
    pub fn active(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .filter(|(_, v)| !Self::is_inert(v))
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn has_active(&self) -> bool {
        self.active().next().is_some()
    }

    /// Active entries as `(key, lower-cased needle)` pairs, ready for matching
    pub fn needles(&self) -> Vec<(String, String)> {
        self.active()
            .map(|(k, v)| (k.to_string(), value_text(v).to_lowercase()))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Plain text form of a host-supplied filter value
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_parse() {
        assert_eq!(SortState::parse("name"), SortState::asc("name"));
        assert_eq!(SortState::parse("name:asc"), SortState::asc("name"));
        assert_eq!(SortState::parse("dateTime:DESC"), SortState::desc("dateTime"));
        assert_eq!(SortState::parse("  "), SortState::default());
        assert!(!SortState::parse("").is_active());
    }

    #[test]
    fn test_sort_cycle() {
        let state = SortState::default().cycle("name");
        assert_eq!(state, SortState::asc("name"));
        let state = state.cycle("name");
        assert_eq!(state, SortState::desc("name"));
        let state = state.cycle("name");
        assert!(!state.is_active());
        assert_eq!(SortState::desc("name").cycle("email"), SortState::asc("email"));
    }

    #[test]
    fn test_page_state_minimum_size() {
        let page = PageState::new(3, 0);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.offset(), 3);
    }

    #[test]
    fn test_page_clamp() {
        let page = PageState::new(7, 10);
        assert_eq!(page.clamped(25).page_index, 2);
        assert_eq!(page.clamped(0).page_index, 0);
        assert_eq!(PageState::new(1, 10).clamped(25).page_index, 1);
        assert_eq!(PageState::new(3, 10).clamped(30).page_index, 2);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(PageState::new(1, 10), 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_prev);
        assert!(meta.has_next);
        assert_eq!(meta.start_record, 11);
        assert_eq!(meta.end_record, 20);

        let last = PaginationMeta::new(PageState::new(2, 10), 25);
        assert!(!last.has_next);
        assert_eq!(last.end_record, 25);
    }

    #[test]
    fn test_pagination_meta_empty() {
        let meta = PaginationMeta::new(PageState::new(0, 10), 0);
        assert_eq!(meta.total_pages, 0);
        assert_eq!(meta.start_record, 0);
        assert_eq!(meta.end_record, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn test_filter_set_inert_entries() {
        let mut filters = FilterSet::new();
        assert!(filters.set("gender", json!("")));
        assert!(filters.set("bloodType", Value::Null));
        assert!(!filters.has_active());
        assert_eq!(filters.len(), 2);

        assert!(filters.set("gender", json!("female")));
        assert!(filters.has_active());
        assert_eq!(
            filters.needles(),
            vec![("gender".to_string(), "female".to_string())]
        );
    }

    #[test]
    fn test_filter_set_change_detection() {
        let mut filters = FilterSet::new();
        assert!(filters.set("status", json!("Confirmed")));
        assert!(!filters.set("status", json!("Confirmed")));
        assert!(filters.remove("status"));
        assert!(!filters.remove("status"));
        assert!(!filters.clear());
    }

    #[test]
    fn test_filter_needles_stringify() {
        let filters: FilterSet = [("duration", json!(30)), ("active", json!(false))]
            .into_iter()
            .collect();
        assert_eq!(
            filters.needles(),
            vec![
                ("duration".to_string(), "30".to_string()),
                ("active".to_string(), "false".to_string()),
            ]
        );
    }
}
