//! Error types for the metadata store

use thiserror::Error;

use crate::ids::RowId;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Ambient errors from configuration, seed data and action replay.
///
/// Store mutations never produce these; they are total.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("Invalid seed schema {file}: {source}")]
    InvalidSeed {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed action on line {line}: {source}")]
    MalformedAction {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Caller-side precondition failures detected before a draft reaches the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Schema name is required")]
    EmptySchemaName,

    #[error("At least one field is required")]
    NoFields,

    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    #[error("Please fill in required fields: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    /// The row being edited was deleted or replaced in the meantime
    #[error("Row {0} no longer exists")]
    RowNotFound(RowId),
}
