//! Cell content and display helpers
//!
//! Nothing a column produces reaches a rendering surface as markup: custom
//! renderer output and resolved values alike are HTML-escaped.

use crate::core::column::ColumnDescriptor;
use crate::core::record::Record;
use serde::Serialize;

/// Name of the synthetic selection column in [`displayed_columns`]
pub const SELECT_COLUMN: &str = "select";

/// Placeholder for cells without a value
pub const EMPTY_CELL: &str = "-";

/// Escaped content for one cell
///
/// Uses the column's renderer when present, otherwise the resolved value's
/// text, falling back to [`EMPTY_CELL`] when the value is absent or empty.
pub fn cell_content<T: Record>(record: &T, column: &ColumnDescriptor<T>) -> String {
    let raw = match &column.render {
        Some(render) => render(record),
        None => record
            .field(&column.key)
            .map(|v| v.to_text())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| EMPTY_CELL.to_string()),
    };
    sanitize(&raw)
}

/// Neutralize text for display inside HTML
pub fn sanitize(raw: &str) -> String {
    tera::escape_html(raw)
}

/// Column keys in display order, with the selection column first when shown
pub fn displayed_columns<T>(columns: &[ColumnDescriptor<T>], show_selection: bool) -> Vec<String> {
    let keys = columns.iter().map(|c| c.key.clone());
    if show_selection {
        std::iter::once(SELECT_COLUMN.to_string()).chain(keys).collect()
    } else {
        keys.collect()
    }
}

/// Why the current page has no rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum EmptyState {
    /// The host is still fetching rows
    Loading,
    /// The ingested collection is empty
    NoData(String),
    /// Rows exist but none survive search and filters
    NoMatches(String),
}

impl EmptyState {
    pub fn message(&self) -> &str {
        match self {
            EmptyState::Loading => "Loading…",
            EmptyState::NoData(message) | EmptyState::NoMatches(message) => message,
        }
    }
}
