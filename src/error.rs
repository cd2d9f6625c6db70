//! Error taxonomy for the record layer. The UI turns every variant into a
//! status message, so the `Display` strings are written for end users.

use thiserror::Error;

/// Failures raised by input parsing, record operations, and report export.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// A required form field was left blank.
    #[error("{0}")]
    Validation(String),

    /// Text was entered where a number is required.
    #[error("{field} must be a number (got '{value}').")]
    NumericFormat { field: &'static str, value: String },

    /// A record referenced by id does not exist.
    #[error("{entity} {id} not found.")]
    NotFound { entity: &'static str, id: i64 },

    /// The SQLite store rejected or failed an operation.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The spreadsheet writer or reader failed.
    #[error("export failed: {0}")]
    Export(String),

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
}

impl InventoryError {
    pub(crate) fn numeric(field: &'static str, value: &str) -> Self {
        InventoryError::NumericFormat {
            field,
            value: value.to_string(),
        }
    }
}

/// Result alias used across the record layer.
pub type Result<T> = std::result::Result<T, InventoryError>;
