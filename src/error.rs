//! Custom error types for moneymanager
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for moneymanager operations
#[derive(Error, Debug)]
pub enum MoneyManagerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// A group with this name already exists somewhere in the hierarchy
    #[error("A group named '{name}' already exists")]
    DuplicateGroupName { name: String },

    /// Hard lookup of a group by name failed
    #[error("Group not found: {name}")]
    GroupNotFound { name: String },

    /// A bind scheduled for removal is not present in the index
    #[error("Bind not found: transaction '{transaction_id}' <-> group '{group_name}'")]
    BindNotFound {
        transaction_id: String,
        group_name: String,
    },

    /// A persisted bind references a transaction or group that no longer exists
    #[error(
        "Bind references missing data: transaction '{transaction_id}' <-> group '{group_name}'"
    )]
    DanglingReference {
        transaction_id: String,
        group_name: String,
    },

    /// A rule document uses a discriminator this version does not know
    #[error("Unknown rule kind '{kind}' in group '{group}'")]
    UnknownRuleKind { kind: String, group: String },

    /// A rule references a transaction field that does not exist
    #[error("Unknown rule field '{field}' in group '{group}'")]
    FieldNotFound { field: String, group: String },

    /// Preview and bypass-confirm were both requested
    #[error("Invalid mode combination: 'preview' and 'bypass_confirm' cannot both be set")]
    InvalidModeCombination,

    /// No registered reader recognized the file
    #[error("No matching reader for file: {file}")]
    NoMatchingReader { file: String },

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl MoneyManagerError {
    /// Create a "group not found" error
    pub fn group_not_found(name: impl Into<String>) -> Self {
        Self::GroupNotFound { name: name.into() }
    }

    /// Create a "duplicate group name" error
    pub fn duplicate_group(name: impl Into<String>) -> Self {
        Self::DuplicateGroupName { name: name.into() }
    }

    /// Check if this error is recoverable at the command level
    /// (per-file import problems and stale references are; structural
    /// integrity errors are not)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DanglingReference { .. } | Self::NoMatchingReader { .. }
        )
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for MoneyManagerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MoneyManagerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for MoneyManagerError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

/// Result type alias for moneymanager operations
pub type MoneyManagerResult<T> = Result<T, MoneyManagerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MoneyManagerError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_duplicate_group_error() {
        let err = MoneyManagerError::duplicate_group("Food");
        assert_eq!(err.to_string(), "A group named 'Food' already exists");
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(MoneyManagerError::NoMatchingReader {
            file: "export.csv".into()
        }
        .is_recoverable());
        assert!(!MoneyManagerError::InvalidModeCombination.is_recoverable());
        assert!(!MoneyManagerError::group_not_found("Food").is_recoverable());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MoneyManagerError = io_err.into();
        assert!(matches!(err, MoneyManagerError::Io(_)));
    }
}
