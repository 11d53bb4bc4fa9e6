//! Column and filter schema

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Custom cell renderer: turns a record into plain cell text
pub type CellRenderer<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Horizontal alignment of a column's cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Edge a column sticks to while scrolling horizontally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickyEdge {
    Start,
    End,
}

/// Describes how to read and display one field across all records
///
/// `key` may be a dotted path (`"address.city"`). Columns are sortable and
/// searchable unless told otherwise.
pub struct ColumnDescriptor<T> {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    pub searchable: bool,
    pub render: Option<CellRenderer<T>>,
    pub align: Align,
    pub width: Option<String>,
    pub sticky: Option<StickyEdge>,
}

impl<T> ColumnDescriptor<T> {
    /// Create a sortable, searchable column
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: true,
            searchable: true,
            render: None,
            align: Align::default(),
            width: None,
            sticky: None,
        }
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Supply custom cell text. The output is escaped before display like
    /// any other cell content.
    pub fn render(mut self, render: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn sticky(mut self, edge: StickyEdge) -> Self {
        self.sticky = Some(edge);
        self
    }
}

// Manual impls: a derive would wrongly require `T: Clone` / `T: Debug`.
impl<T> Clone for ColumnDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            sortable: self.sortable,
            searchable: self.searchable,
            render: self.render.clone(),
            align: self.align,
            width: self.width.clone(),
            sticky: self.sticky,
        }
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("searchable", &self.searchable)
            .field("render", &self.render.as_ref().map(|_| "<fn>"))
            .field("align", &self.align)
            .field("width", &self.width)
            .field("sticky", &self.sticky)
            .finish()
    }
}

/// Kind of input a host shows for a column filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    Text,
    Select,
    Date,
    Number,
}

/// One choice of a `select` filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: Value,
    pub label: String,
}

/// Declarative description of a filter the host can offer
///
/// The engine does not interpret `kind` or `options`; they tell the host what
/// widget to draw. The value the user picks is applied with
/// [`DataTable::set_filter`](crate::table::DataTable::set_filter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    pub label: String,
    pub key: String,
    #[serde(default, rename = "type")]
    pub kind: FilterKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FilterOption>,
}

impl FilterDefinition {
    /// Label of the option whose value matches, if this is a select filter
    pub fn option_label(&self, value: &Value) -> Option<&str> {
        self.options
            .iter()
            .find(|opt| &opt.value == value)
            .map(|opt| opt.label.as_str())
    }
}
