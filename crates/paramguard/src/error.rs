//! Error types for the paramguard library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for paramguard operations.
///
/// Validators never produce these: a malformed value is simply invalid.
/// Errors only come from loading snapshots, building registries, and
/// talking to the warehouse.
#[derive(Debug, Error)]
pub enum ParamguardError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing CSV/TSV data.
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Two rules were registered under the same parameter name.
    #[error("Duplicate validator for parameter '{0}'")]
    DuplicateParameter(String),

    /// A parameter name that cannot be used as a SQL column identifier.
    #[error("Invalid column identifier: '{0}'")]
    InvalidIdentifier(String),

    /// The warehouse rejected or failed a query.
    #[error("Warehouse error: {0}")]
    Warehouse(String),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for paramguard operations.
pub type Result<T> = std::result::Result<T, ParamguardError>;
