//! Error types for the masplit library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum MasplitError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Specified record number is less than one: {0}")]
    InvalidRecord(i64),

    #[error("Sort order should be either 0 (increasing) or 1 (decreasing), got {0}")]
    InvalidSortOrder(i64),

    #[error("Delimiter must be a single character, got '{0}'")]
    InvalidDelimiter(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MasplitError {
    /// Whether this error stems from an invalid split configuration
    /// rather than from the input data or I/O.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRecord(_) | Self::InvalidSortOrder(_) | Self::InvalidDelimiter(_)
        )
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, MasplitError>;
