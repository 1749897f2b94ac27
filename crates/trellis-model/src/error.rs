//! Error types shared by the trellis crates.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while validating metadata, building records, or writing artifacts.
#[derive(Debug, Error)]
pub enum TrellisError {
    /// A table column has no corresponding column metadata entry.
    #[error("column '{column}' has no metadata entry")]
    MissingMetadata { column: String },

    /// The same column name was declared twice.
    #[error("duplicate column name: {name}")]
    DuplicateColumn { name: String },

    /// Column names must not be empty.
    #[error("column name must not be empty")]
    EmptyColumnName,

    /// A factor column was declared without levels.
    #[error("factor column '{column}' has no levels")]
    EmptyLevels { column: String },

    /// Levels were supplied for a column that is not a factor.
    #[error("column '{column}' is {kind} but declares levels")]
    UnexpectedLevels { column: String, kind: String },

    /// A row does not have one value per table column.
    #[error("row {row} has {actual} values, expected {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A factor cell could not be mapped onto its levels in strict mode.
    #[error("row {row}, column '{column}': {detail}")]
    FactorAnomaly {
        row: usize,
        column: String,
        detail: String,
    },

    /// The JS global binding name is not a valid identifier.
    #[error("invalid JS binding name: '{name}'")]
    InvalidBinding { name: String },

    /// A rendered artifact does not have the expected shape.
    #[error("invalid artifact: {reason}")]
    InvalidArtifact { reason: String },

    /// The document could not be rendered.
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// File I/O error.
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temp file could not be moved into place.
    #[error("failed to move {temp_path} into {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrellisError {
    /// Wrap an I/O error with the operation and path that failed.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Returns true for errors caused by an incomplete or inconsistent schema.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::MissingMetadata { .. }
                | Self::DuplicateColumn { .. }
                | Self::EmptyColumnName
                | Self::EmptyLevels { .. }
                | Self::UnexpectedLevels { .. }
        )
    }
}

/// Result type alias for trellis operations.
pub type Result<T> = std::result::Result<T, TrellisError>;
