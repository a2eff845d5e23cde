//! Error types for the todo store.
//!
//! # Design
//! `StoreError` separates the three outcomes a caller must treat differently:
//! bad input (`Validation`), a missing record (`NotFound`), and a failure of
//! the backing medium (`Storage`). Storage errors keep the path and source
//! for logs; front ends are expected not to echo them to clients.

use std::path::PathBuf;

/// Failures of a `TodoStorage` backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing file could not be read, written, or renamed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored document is not a valid JSON array of todos.
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The collection could not be encoded.
    #[error("failed to encode collection: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Errors returned by `TodoStore` operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// One or more field rules were violated. Holds every message.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// No record has the requested id.
    #[error("todo {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
