use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Lookup-table errors
// ---------------------------------------------------------------------------

/// Errors raised while reading, building or querying a lookup table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Resource not found: {path}")]
    ResourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed input at row {row}: {message}")]
    MalformedInput { row: usize, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl TableError {
    pub(crate) fn malformed(row: usize, message: impl Into<String>) -> Self {
        TableError::MalformedInput {
            row,
            message: message.into(),
        }
    }
}

pub type TableResult<T> = Result<T, TableError>;

// ---------------------------------------------------------------------------
// Plan repository errors
// ---------------------------------------------------------------------------

/// Errors raised by the plan repository client.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type PlanResult<T> = Result<T, PlanError>;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
