//! The table engine
//!
//! [`DataTable`] takes a record collection and a column schema and keeps a
//! searched, filtered, sorted, paginated and selectable view of it.
//!
//! ```text
//! rows ─┬─▶ filter ──▶ sort ──▶ page ──▶ page_rows()
//! search┘     ▲          ▲        ▲
//! filters ────┘   sort ──┘ page ──┘
//!
//! selection (keys) ── observed against the page view, never cleared by it
//! ```
//!
//! Every mutation marks the earliest stage whose inputs changed and
//! recomputes from there synchronously, so readers always see one consistent
//! snapshot. Setting an input to the value it already has recomputes nothing
//! and publishes nothing.

pub mod pipeline;
pub mod render;

use crate::config::TableConfig;
use crate::core::column::ColumnDescriptor;
use crate::core::error::{Result, TableError};
use crate::core::events::{EventBus, EventEnvelope, TableEvent};
use crate::core::query::{FilterSet, PageState, PaginationMeta, SortDirection, SortState};
use crate::core::record::Record;
use crate::core::selection::{Selection, SelectionMode};
use pipeline::{filter_indices, page_window, sort_indices};
use render::EmptyState;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use tokio::sync::broadcast;

/// Pipeline stages in dependency order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Filter,
    Sort,
    Page,
}

/// Searchable, filterable, sortable, paginated, selectable view over records
pub struct DataTable<T: Record> {
    rows: Vec<T>,
    key_index: HashMap<String, usize>,
    columns: Vec<ColumnDescriptor<T>>,
    config: TableConfig,
    loading: bool,

    search: String,
    filters: FilterSet,
    sort: SortState,
    page: PageState,
    selection: Selection,

    filtered: Vec<usize>,
    sorted: Vec<usize>,
    window: Range<usize>,
    dirty: Option<Stage>,

    events: EventBus<T>,
}

impl<T: Record> DataTable<T> {
    /// Create a table over `rows` with the given schema and behaviour
    pub fn new(
        rows: Vec<T>,
        columns: Vec<ColumnDescriptor<T>>,
        config: TableConfig,
    ) -> Result<Self> {
        config.validate()?;
        validate_columns(&columns)?;

        let filters = config
            .initial_filters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut table = Self {
            key_index: index_keys(&rows),
            rows,
            columns,
            loading: false,
            search: String::new(),
            filters,
            sort: SortState::default(),
            page: PageState::new(0, config.page_size),
            selection: Selection::new(config.selection_mode()),
            filtered: Vec::new(),
            sorted: Vec::new(),
            window: 0..0,
            dirty: Some(Stage::Filter),
            events: EventBus::new(config.event_capacity),
            config,
        };
        table.refresh();
        Ok(table)
    }

    /// Create a table whose columns come from `config.columns`
    pub fn from_config(rows: Vec<T>, config: TableConfig) -> Result<Self> {
        let columns = config.column_descriptors();
        Self::new(rows, columns, config)
    }

    // -------------------------------------------------------------------------
    // Ingestion
    // -------------------------------------------------------------------------

    /// Replace the record collection
    ///
    /// Selected keys that no longer exist in the new collection are dropped;
    /// everything else about the selection survives.
    pub fn set_data(&mut self, rows: Vec<T>) {
        self.key_index = index_keys(&rows);
        self.rows = rows;

        let key_index = &self.key_index;
        let pruned = self.selection.retain(|key| key_index.contains_key(key));

        self.invalidate(Stage::Filter);
        self.refresh();

        if pruned {
            tracing::debug!(
                remaining = self.selection.len(),
                "Dropped selected rows missing from new data"
            );
            self.publish_selection();
        }
    }

    /// Replace the column schema
    pub fn set_columns(&mut self, columns: Vec<ColumnDescriptor<T>>) -> Result<()> {
        validate_columns(&columns)?;
        self.columns = columns;
        self.invalidate(Stage::Filter);
        self.refresh();
        Ok(())
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // -------------------------------------------------------------------------
    // Search and filters
    // -------------------------------------------------------------------------

    /// Apply a settled search term
    ///
    /// Raw keystrokes should go through
    /// [`SearchDebouncer`](crate::search::SearchDebouncer) or
    /// [`TableHandle::set_search_term`](crate::handle::TableHandle::set_search_term).
    /// A new term sends the user back to the first page. Returns false when
    /// the term equals the current one.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if term == self.search {
            return false;
        }
        tracing::debug!(term = %term, "Applying search term");
        self.search = term;
        self.invalidate(Stage::Filter);
        self.update_page(PageState::new(0, self.page.page_size));
        self.refresh();
        true
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn clear_search(&mut self) -> bool {
        self.set_search_term(String::new())
    }

    /// Filter `key` (a column path) by a case-insensitive substring of `value`
    ///
    /// Null or empty-string values keep the entry but make it inert.
    /// Any change sends the user back to the first page.
    pub fn set_filter(&mut self, key: impl Into<String>, value: Value) -> bool {
        if !self.filters.set(key, value) {
            return false;
        }
        self.invalidate(Stage::Filter);
        self.update_page(PageState::new(0, self.page.page_size));
        self.refresh();
        true
    }

    pub fn remove_filter(&mut self, key: &str) -> bool {
        if !self.filters.remove(key) {
            return false;
        }
        self.invalidate(Stage::Filter);
        self.update_page(PageState::new(0, self.page.page_size));
        self.refresh();
        true
    }

    /// Drop every column filter and the search term, back to the first page
    pub fn clear_filters(&mut self) {
        let had_filters = self.filters.clear();
        let had_search = !self.search.is_empty();
        self.search.clear();
        if had_filters || had_search {
            self.invalidate(Stage::Filter);
        }
        self.update_page(PageState::new(0, self.page.page_size));
        self.refresh();
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn has_active_filters(&self) -> bool {
        self.filters.has_active()
    }

    /// Active filters as `(key, value)` pairs, for chips in the host UI
    pub fn active_filter_entries(&self) -> Vec<(String, Value)> {
        self.filters
            .active()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Sort
    // -------------------------------------------------------------------------

    /// Change the active sort
    ///
    /// Requests to sort on a column declared `sortable: false` are ignored.
    /// Returns whether the sort state changed.
    pub fn set_sort(&mut self, sort: SortState) -> bool {
        if sort.is_active()
            && let Some(column) = self.column(&sort.active)
            && !column.sortable
        {
            tracing::warn!(column = %sort.active, "Ignoring sort on unsortable column");
            return false;
        }
        if sort == self.sort {
            return false;
        }

        self.sort = sort;
        self.invalidate(Stage::Sort);
        self.refresh();
        self.events.publish(TableEvent::SortChanged {
            sort: self.sort.clone(),
        });
        true
    }

    pub fn sort_by(&mut self, key: impl Into<String>, direction: SortDirection) -> bool {
        self.set_sort(SortState::new(key, direction))
    }

    /// Header activation: ascending → descending → unsorted
    pub fn cycle_sort(&mut self, key: &str) -> bool {
        let next = self.sort.cycle(key);
        self.set_sort(next)
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Move to `page_index` with `page_size` rows per page
    ///
    /// The index is clamped to the last page holding rows. A zero size is
    /// treated as one. Returns whether the page state changed.
    pub fn set_page(&mut self, page_index: usize, page_size: usize) -> bool {
        let changed = self.update_page(PageState::new(page_index, page_size));
        self.refresh();
        changed
    }

    /// Change the page size, keeping the first visible row on screen
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let page_size = page_size.max(1);
        let first_row = self.page.offset();
        self.set_page(first_row / page_size, page_size)
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.page.page_index.saturating_add(1), self.page.page_size)
    }

    pub fn previous_page(&mut self) -> bool {
        self.set_page(self.page.page_index.saturating_sub(1), self.page.page_size)
    }

    pub fn page_state(&self) -> PageState {
        self.page
    }

    /// Configured page sizes, with the current size merged in
    pub fn page_size_options(&self) -> Vec<usize> {
        let mut options = self.config.page_size_options.clone();
        if !options.contains(&self.page.page_size) {
            options.push(self.page.page_size);
            options.sort_unstable();
        }
        options
    }

    pub fn pagination(&self) -> PaginationMeta {
        let total = self.total_records();
        if self.config.show_pagination {
            PaginationMeta::new(self.page, total)
        } else {
            PaginationMeta::new(PageState::new(0, total), total)
        }
    }

    // -------------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------------

    /// The ingested collection, as supplied
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn ingested_len(&self) -> usize {
        self.rows.len()
    }

    /// Rows surviving search and filters, in ingested order
    pub fn filtered(&self) -> Vec<&T> {
        self.filtered.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Filtered rows in sort order
    pub fn sorted(&self) -> Vec<&T> {
        self.sorted.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Rows on the current page
    pub fn page_rows(&self) -> Vec<&T> {
        self.sorted[self.window.clone()]
            .iter()
            .map(|&i| &self.rows[i])
            .collect()
    }

    /// Number of rows surviving search and filters
    pub fn total_records(&self) -> usize {
        self.filtered.len()
    }

    pub fn columns(&self) -> &[ColumnDescriptor<T>] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDescriptor<T>> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Flip the selection of a row. Rows not in the collection are ignored.
    pub fn toggle_row(&mut self, record: &T) -> bool {
        let key = record.key();
        if !self.key_index.contains_key(&key) {
            tracing::debug!(key = %key, "Ignoring toggle for row outside the collection");
            return false;
        }
        self.selection.toggle(&key);
        self.publish_selection();
        true
    }

    pub fn select_row(&mut self, record: &T) -> bool {
        let key = record.key();
        if !self.key_index.contains_key(&key) || !self.selection.select(&key) {
            return false;
        }
        self.publish_selection();
        true
    }

    pub fn deselect_row(&mut self, record: &T) -> bool {
        if !self.selection.deselect(&record.key()) {
            return false;
        }
        self.publish_selection();
        true
    }

    pub fn is_selected(&self, record: &T) -> bool {
        self.selection.is_selected(&record.key())
    }

    /// Add every row on the current page to the selection
    ///
    /// In single mode only the first row of the page is selected.
    pub fn select_all_visible(&mut self) -> bool {
        let keys = self.page_keys();
        if !self.selection.select_all(keys.iter().map(String::as_str)) {
            return false;
        }
        self.publish_selection();
        true
    }

    /// Clear everything when the whole page is selected, else select the page
    pub fn toggle_all_visible(&mut self) -> bool {
        if self.is_all_selected() {
            self.clear_selection()
        } else {
            self.select_all_visible()
        }
    }

    pub fn clear_selection(&mut self) -> bool {
        if !self.selection.clear() {
            return false;
        }
        self.publish_selection();
        true
    }

    /// Whether the page has rows and every one of them is selected
    pub fn is_all_selected(&self) -> bool {
        let keys = self.page_keys();
        self.selection.contains_all(keys.iter().map(String::as_str))
    }

    /// Whether something is selected but not the whole page
    pub fn is_indeterminate(&self) -> bool {
        !self.selection.is_empty() && !self.is_all_selected()
    }

    /// Selected rows in ingested order, including ones hidden by filters
    pub fn selected_rows(&self) -> Vec<&T> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.rows
            .iter()
            .filter(|row| self.selection.is_selected(&row.key()))
            .collect()
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        if self.selection.set_mode(mode) {
            self.publish_selection();
        }
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Report a row click to subscribers
    pub fn activate_row(&self, record: &T) {
        self.events.publish(TableEvent::RowActivated {
            record: record.clone(),
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope<T>> {
        self.events.subscribe()
    }

    pub fn events(&self) -> &EventBus<T> {
        &self.events
    }

    // -------------------------------------------------------------------------
    // Display
    // -------------------------------------------------------------------------

    pub fn displayed_columns(&self) -> Vec<String> {
        render::displayed_columns(&self.columns, self.config.show_selection)
    }

    /// Escaped content of one cell
    pub fn cell_content(&self, record: &T, column: &ColumnDescriptor<T>) -> String {
        render::cell_content(record, column)
    }

    /// Escaped content of the cell under column `key`, if the column exists
    pub fn cell(&self, record: &T, key: &str) -> Option<String> {
        self.column(key).map(|c| render::cell_content(record, c))
    }

    /// Why the page is empty, or `None` when it has rows
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.loading {
            return Some(EmptyState::Loading);
        }
        if !self.window.is_empty() {
            return None;
        }
        if self.rows.is_empty() {
            Some(EmptyState::NoData(self.config.empty_message.clone()))
        } else {
            Some(EmptyState::NoMatches(self.config.no_match_message.clone()))
        }
    }

    /// Human-readable position, e.g. "Showing 11–20 of 25"
    pub fn result_summary(&self) -> String {
        let meta = self.pagination();
        if meta.total == 0 {
            return "Showing 0 of 0".to_string();
        }
        format!(
            "Showing {}–{} of {}",
            meta.start_record, meta.end_record, meta.total
        )
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// Rows to export: the selection when there is one, else the filtered view
    pub fn export_rows(&self) -> Vec<&T> {
        if self.selection.is_empty() {
            self.filtered()
        } else {
            self.selected_rows()
        }
    }

    /// [`export_rows`](Self::export_rows) as pretty-printed JSON
    pub fn export_json(&self) -> Result<String>
    where
        T: Serialize,
    {
        let rows = self.export_rows();
        let json = serde_json::to_string_pretty(&rows)?;
        tracing::debug!(rows = rows.len(), "Exported table rows");
        Ok(json)
    }

    // -------------------------------------------------------------------------
    // Recomputation
    // -------------------------------------------------------------------------

    fn invalidate(&mut self, stage: Stage) {
        self.dirty = Some(self.dirty.map_or(stage, |current| current.min(stage)));
    }

    /// Set the page state, publishing `PageChanged` when it differs
    fn update_page(&mut self, page: PageState) -> bool {
        let page = if self.config.show_pagination && self.dirty.is_none_or(|d| d > Stage::Sort) {
            page.clamped(self.sorted.len())
        } else {
            page
        };
        if page == self.page {
            return false;
        }
        self.page = page;
        self.invalidate(Stage::Page);
        self.events.publish(TableEvent::PageChanged { page });
        true
    }

    fn refresh(&mut self) {
        let Some(stage) = self.dirty.take() else {
            return;
        };

        if stage <= Stage::Filter {
            self.filtered = filter_indices(&self.rows, &self.columns, &self.search, &self.filters);
        }
        if stage <= Stage::Sort {
            self.sorted = sort_indices(&self.rows, &self.filtered, &self.sort);
        }

        if self.config.show_pagination {
            let clamped = self.page.clamped(self.sorted.len());
            if clamped != self.page {
                tracing::debug!(
                    from = self.page.page_index,
                    to = clamped.page_index,
                    "Clamped page index to last page"
                );
                self.page = clamped;
                self.events.publish(TableEvent::PageChanged { page: clamped });
            }
        }
        self.window = page_window(self.sorted.len(), self.page, self.config.show_pagination);

        tracing::debug!(
            stage = ?stage,
            ingested = self.rows.len(),
            filtered = self.filtered.len(),
            page_rows = self.window.len(),
            "Recomputed table views"
        );
    }

    fn page_keys(&self) -> Vec<String> {
        self.sorted[self.window.clone()]
            .iter()
            .map(|&i| self.rows[i].key())
            .collect()
    }

    fn publish_selection(&self) {
        let selected = self.selected_rows().into_iter().cloned().collect();
        self.events.publish(TableEvent::SelectionChanged { selected });
    }
}

fn validate_columns<T>(columns: &[ColumnDescriptor<T>]) -> Result<()> {
    let mut seen = HashSet::new();
    for (index, column) in columns.iter().enumerate() {
        if column.key.is_empty() {
            return Err(TableError::EmptyColumnKey { index });
        }
        if !seen.insert(column.key.as_str()) {
            return Err(TableError::DuplicateColumn {
                key: column.key.clone(),
            });
        }
    }
    Ok(())
}

fn index_keys<T: Record>(rows: &[T]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        index.entry(row.key()).or_insert(i);
    }
    index
}
