//! Configuration loading and management

use crate::core::column::{Align, ColumnDescriptor, FilterDefinition, StickyEdge};
use crate::core::error::{ConfigError, Result};
use crate::core::selection::SelectionMode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

fn default_page_size() -> usize {
    10
}

fn default_page_size_options() -> Vec<usize> {
    vec![5, 10, 25, 50, 100]
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_empty_message() -> String {
    "No data available".to_string()
}

fn default_no_match_message() -> String {
    "No records match the current search or filters".to_string()
}

fn default_event_capacity() -> usize {
    1024
}

/// Serializable column metadata (everything but a custom renderer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub key: String,
    pub label: String,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default = "default_true")]
    pub searchable: bool,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub sticky: Option<StickyEdge>,
}

impl ColumnConfig {
    /// Build a descriptor without a custom renderer
    pub fn to_descriptor<T>(&self) -> ColumnDescriptor<T> {
        ColumnDescriptor {
            key: self.key.clone(),
            label: self.label.clone(),
            sortable: self.sortable,
            searchable: self.searchable,
            render: None,
            align: self.align,
            width: self.width.clone(),
            sticky: self.sticky,
        }
    }
}

/// Behaviour of one table instance
///
/// Every field has a default, so an empty YAML document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Initial rows per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Page sizes the host offers in its page-size picker
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,

    /// When false the whole sorted view is one page
    #[serde(default = "default_true")]
    pub show_pagination: bool,

    #[serde(default = "default_true")]
    pub show_search: bool,

    /// Adds the leading `select` column to the displayed columns
    #[serde(default)]
    pub show_selection: bool,

    #[serde(default = "default_true")]
    pub multi_select: bool,

    /// Quiet period before a typed search term settles
    #[serde(default = "default_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Shown when there are no rows at all
    #[serde(default = "default_empty_message")]
    pub empty_message: String,

    /// Shown when rows exist but none match search and filters
    #[serde(default = "default_no_match_message")]
    pub no_match_message: String,

    /// Column filters active when the table is created
    #[serde(default)]
    pub initial_filters: IndexMap<String, Value>,

    /// Filters the host offers
    #[serde(default)]
    pub filters: Vec<FilterDefinition>,

    /// Optional column schema, for tables configured entirely from YAML
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,

    /// Broadcast buffer for table events
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_size_options: default_page_size_options(),
            show_pagination: true,
            show_search: true,
            show_selection: false,
            multi_select: true,
            search_debounce_ms: default_debounce_ms(),
            empty_message: default_empty_message(),
            no_match_message: default_no_match_message(),
            initial_filters: IndexMap::new(),
            filters: Vec::new(),
            columns: Vec::new(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl TableConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::from(e)
            }
        })?;

        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            })?;
        config.validate()?;

        tracing::info!(path = %path.display(), page_size = config.page_size, "Loaded table config");
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(invalid("page_size", "0", "must be greater than zero"));
        }
        if let Some(bad) = self.page_size_options.iter().find(|&&size| size == 0) {
            return Err(invalid(
                "page_size_options",
                &bad.to_string(),
                "page sizes must be greater than zero",
            ));
        }
        if self.event_capacity == 0 {
            return Err(invalid("event_capacity", "0", "must be greater than zero"));
        }

        let mut seen = std::collections::HashSet::new();
        for column in &self.columns {
            if column.key.is_empty() {
                return Err(invalid("columns.key", "", "column keys must not be empty"));
            }
            if !seen.insert(column.key.as_str()) {
                return Err(invalid("columns.key", &column.key, "duplicate column key"));
            }
        }
        Ok(())
    }

    pub fn selection_mode(&self) -> SelectionMode {
        SelectionMode::from_multi(self.multi_select)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Column descriptors for the configured schema
    pub fn column_descriptors<T>(&self) -> Vec<ColumnDescriptor<T>> {
        self.columns.iter().map(ColumnConfig::to_descriptor::<T>).collect()
    }
}

fn invalid(field: &str, value: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config() {
        let config = TableConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.page_size_options, vec![5, 10, 25, 50, 100]);
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
        assert_eq!(config.selection_mode(), SelectionMode::Multiple);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = TableConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, TableConfig::default());
    }

    #[test]
    fn test_yaml_full() {
        let yaml = r#"
page_size: 25
multi_select: false
show_selection: true
search_debounce_ms: 300
empty_message: No patients yet
initial_filters:
  gender: female
filters:
  - label: Gender
    key: gender
    type: select
    options:
      - value: female
        label: Female
columns:
  - key: firstName
    label: First Name
  - key: address.city
    label: City
    align: center
  - key: actions
    label: Actions
    sortable: false
    searchable: false
    sticky: end
"#;
        let config = TableConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.selection_mode(), SelectionMode::Single);
        assert_eq!(config.initial_filters.get("gender"), Some(&json!("female")));
        assert_eq!(config.filters.len(), 1);

        let columns = config.column_descriptors::<serde_json::Value>();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[1].align, Align::Center);
        assert!(!columns[2].sortable);
        assert_eq!(columns[2].sticky, Some(StickyEdge::End));
    }

    #[test]
    fn test_yaml_serialization_roundtrip() {
        let config = TableConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = TableConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let err = TableConfig::from_yaml_str("page_size: 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "page_size"));
    }

    #[test]
    fn test_page_size_outside_options_accepted() {
        let config = TableConfig::from_yaml_str("page_size: 20").unwrap();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.page_size_options, vec![5, 10, 25, 50, 100]);
    }

    #[test]
    fn test_rejects_duplicate_columns() {
        let yaml = r#"
columns:
  - key: name
    label: Name
  - key: name
    label: Again
"#;
        let err = TableConfig::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate column key"));
    }

    #[test]
    fn test_parse_error() {
        let err = TableConfig::from_yaml_str("page_size: [not a number").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_PARSE_ERROR");
    }

    #[test]
    fn test_missing_file() {
        let err = TableConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
