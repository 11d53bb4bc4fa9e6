//! Typed error handling for the table engine
//!
//! The transform pipeline itself is total: malformed column paths, out-of-range
//! page indexes and mixed-type comparisons all degrade to a safe default and
//! never surface here. Errors only exist at the boundaries where the host hands
//! us something we cannot accept:
//!
//! - [`ConfigError`]: configuration parsing and validation
//! - [`TableError`]: construction, column schema, export and debounce plumbing
//!
//! # Example
//!
//! ```rust,ignore
//! match DataTable::new(rows, columns, config) {
//!     Ok(table) => table,
//!     Err(TableError::DuplicateColumn { key }) => panic!("column '{}' declared twice", key),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use thiserror::Error;

/// Errors related to table configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration text
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

impl ConfigError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }
}

/// The main error type for the table engine
#[derive(Debug, Error)]
pub enum TableError {
    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Two column descriptors share the same key
    #[error("Column '{key}' is declared more than once")]
    DuplicateColumn { key: String },

    /// A column descriptor has an empty key
    #[error("Column at position {index} has an empty key")]
    EmptyColumnKey { index: usize },

    /// Failed to serialize rows for export
    #[error("Failed to export rows: {message}")]
    Export { message: String },

    /// The search debouncer task is no longer running
    #[error("Search debouncer has shut down")]
    DebouncerClosed,
}

impl TableError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            TableError::Config(e) => e.error_code(),
            TableError::DuplicateColumn { .. } => "DUPLICATE_COLUMN",
            TableError::EmptyColumnKey { .. } => "EMPTY_COLUMN_KEY",
            TableError::Export { .. } => "EXPORT_ERROR",
            TableError::DebouncerClosed => "DEBOUNCER_CLOSED",
        }
    }
}

impl From<serde_json::Error> for TableError {
    fn from(err: serde_json::Error) -> Self {
        TableError::Export {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

/// Convenience result alias used across the crate
pub type Result<T, E = TableError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_with_file() {
        let err = ConfigError::ParseError {
            file: Some("table.yaml".to_string()),
            message: "bad indent".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse config file 'table.yaml': bad indent"
        );
    }

    #[test]
    fn test_parse_error_display_without_file() {
        let err = ConfigError::ParseError {
            file: None,
            message: "bad indent".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to parse config: bad indent");
    }

    #[test]
    fn test_config_error_wraps_transparently() {
        let err: TableError = ConfigError::FileNotFound {
            path: "missing.yaml".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Configuration file not found: missing.yaml");
        assert_eq!(err.error_code(), "CONFIG_FILE_NOT_FOUND");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            TableError::DuplicateColumn {
                key: "name".to_string()
            }
            .error_code(),
            "DUPLICATE_COLUMN"
        );
        assert_eq!(TableError::DebouncerClosed.error_code(), "DEBOUNCER_CLOSED");
        assert_eq!(
            TableError::EmptyColumnKey { index: 2 }.error_code(),
            "EMPTY_COLUMN_KEY"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ConfigError = io.into();
        assert!(matches!(err, ConfigError::IoError { .. }));
        assert!(err.to_string().contains("denied"));
    }
}
