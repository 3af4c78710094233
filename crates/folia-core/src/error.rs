//! Core Error Types
//!
//! Errors surfaced by the snapshot builder and its collaborators. Data-quality
//! problems in individual records never show up here; they are filtered out
//! during indexing and materialization.

use thiserror::Error;

/// Failure reported by a [`RecordSource`](crate::source::RecordSource).
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    #[error("I/O error reading {collection}: {message}")]
    Io { collection: String, message: String },

    #[error("Malformed collection {collection}: {message}")]
    Malformed { collection: String, message: String },

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by snapshot consumers.
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    #[error("Data is still being loaded")]
    NotReady,

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

pub type CoreResult<T> = Result<T, CoreError>;
