//! # data-table
//!
//! A generic tabular-data engine for list views: give it any record
//! collection and a column schema, and it keeps a searched, filtered, sorted,
//! paginated and selectable view of it.
//!
//! ## Features
//!
//! - **Global search**: case-insensitive substring match across searchable columns
//! - **Column filters**: conjunctive, keyed by (possibly dotted) column path
//! - **Type-aware sort**: dates by instant, numbers numerically, missing values last
//! - **Pagination**: never panics, auto-clamps to the last page when results shrink
//! - **Key-based selection**: single or multiple, survives sort, page and filter changes
//! - **Debounced search**: cancellable quiet-period actor on tokio
//! - **Safe cells**: all cell content is HTML-escaped before display
//! - **Events**: row activation, selection, sort and page changes over a broadcast bus
//!
//! ## Quick Start
//!
//! ```rust
//! use data_table::prelude::*;
//! use serde_json::json;
//!
//! let rows = vec![
//!     json!({"id": 2, "name": "Beta"}),
//!     json!({"id": 1, "name": "Alpha"}),
//! ];
//! let columns = vec![
//!     ColumnDescriptor::new("id", "ID"),
//!     ColumnDescriptor::new("name", "Name"),
//! ];
//!
//! let mut table = DataTable::new(rows, columns, TableConfig::default()).unwrap();
//! table.set_sort(SortState::asc("name"));
//!
//! let names: Vec<_> = table.page_rows().iter().map(|r| r["name"].clone()).collect();
//! assert_eq!(names, vec![json!("Alpha"), json!("Beta")]);
//! ```

pub mod config;
pub mod core;
pub mod handle;
pub mod search;
pub mod table;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        column::{Align, ColumnDescriptor, FilterDefinition, FilterKind, FilterOption, StickyEdge},
        error::{ConfigError, TableError},
        events::{EventBus, EventEnvelope, TableEvent},
        field::FieldValue,
        query::{FilterSet, PageState, PaginationMeta, SortDirection, SortState},
        record::Record,
        selection::SelectionMode,
    };

    // === Engine ===
    pub use crate::table::{DataTable, render::EmptyState};

    // === Search ===
    pub use crate::handle::TableHandle;
    pub use crate::search::SearchDebouncer;

    // === Config ===
    pub use crate::config::{ColumnConfig, TableConfig};
}
