//! Core types shared by the table engine

pub mod column;
pub mod error;
pub mod events;
pub mod field;
pub mod query;
pub mod record;
pub mod selection;

pub use column::{Align, CellRenderer, ColumnDescriptor, FilterDefinition, FilterKind, FilterOption, StickyEdge};
pub use error::{ConfigError, TableError};
pub use events::{EventBus, EventEnvelope, TableEvent};
pub use field::{FieldValue, compare_values};
pub use query::{FilterSet, PageState, PaginationMeta, SortDirection, SortState};
pub use record::{Record, resolve_path};
pub use selection::{Selection, SelectionMode};
