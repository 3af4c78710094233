//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use folia_core::CoreError;
use folia_query::QueryError;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Data is still being loaded. Please try again later.")]
    NotReady,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),

    #[error("Invalid address: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WebError>;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WebError::Internal(_) | WebError::Config(_) | WebError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            WebError::NotReady => "not_ready",
            WebError::NotFound(_) => "not_found",
            WebError::Validation(_) => "validation_error",
            WebError::Internal(_) | WebError::Config(_) | WebError::Io(_) => "internal_error",
        }
    }
}

impl From<QueryError> for WebError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::NotReady => WebError::NotReady,
            QueryError::NotFound(msg) => WebError::NotFound(msg),
            QueryError::Validation(msg) => WebError::Validation(msg),
            QueryError::Internal(msg) => WebError::Internal(msg),
        }
    }
}

impl From<CoreError> for WebError {
    fn from(err: CoreError) -> Self {
        QueryError::from(err).into()
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            error!(code = self.code(), "Request failed: {}", self);
        }
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
