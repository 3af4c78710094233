use folia_core::CoreError;
use thiserror::Error;

pub type QueryResult<T> = Result<T, QueryError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Data is still being loaded")]
    NotReady,

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid query: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<CoreError> for QueryError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotReady => QueryError::NotReady,
            CoreError::NotFound(message) => QueryError::NotFound(message),
            CoreError::Source(source) => QueryError::Internal(source.to_string()),
        }
    }
}
