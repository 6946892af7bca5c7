use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

use vellum_index::IndexError;
use vellum_store::StoreError;
use vellum_types::TypeError;

/// Failures of the server itself: startup, configuration, auth backends.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::from(&self))).into_response()
    }
}

/// Failures of a single object retrieval. Each maps to one response status.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Empty, malformed, or non-v4 identifier.
    #[error("{0}")]
    InvalidIdentifier(TypeError),

    #[error("missing client identity")]
    MissingClientIdentity,

    /// The index resolver failed. Answered with
    /// [`RetrievalError::INDEX_UNAVAILABLE_STATUS`].
    #[error("index lookup failed: {0}")]
    IndexUnavailable(#[from] IndexError),

    /// Absent from the index, or indexed but absent from the store. The two
    /// causes share one message.
    #[error("Object not found")]
    ObjectNotFound,

    /// The store failed before the response was committed.
    #[error("store read failed: {0}")]
    StoreRead(#[from] StoreError),

    #[error("invalid header value: {0}")]
    InvalidHeader(String),
}

impl RetrievalError {
    /// Status for index resolver failures. Kept at 400 to match existing
    /// clients even though the fault is on the backend side.
    pub const INDEX_UNAVAILABLE_STATUS: StatusCode = StatusCode::BAD_REQUEST;

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            Self::MissingClientIdentity => StatusCode::UNAUTHORIZED,
            Self::IndexUnavailable(_) => Self::INDEX_UNAVAILABLE_STATUS,
            Self::ObjectNotFound => StatusCode::NOT_FOUND,
            Self::StoreRead(_) | Self::InvalidHeader(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RetrievalError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::from(&self))).into_response()
    }
}

/// JSON error payload: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl<E: std::error::Error> From<&E> for ErrorBody {
    fn from(err: &E) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retrieval_status_codes() {
        assert_eq!(
            RetrievalError::InvalidIdentifier(TypeError::Empty).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RetrievalError::IndexUnavailable(IndexError::Unavailable("down".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(RetrievalError::ObjectNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            RetrievalError::StoreRead(StoreError::Cancelled).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RetrievalError::MissingClientIdentity.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn not_found_message_is_uniform() {
        assert_eq!(RetrievalError::ObjectNotFound.to_string(), "Object not found");
    }

    #[test]
    fn invalid_identifier_exposes_parse_failure() {
        let err = RetrievalError::InvalidIdentifier(TypeError::UnsupportedVersion(1));
        assert_eq!(
            err.to_string(),
            "unsupported object id version: expected 4, got 1"
        );
    }

    #[test]
    fn server_error_status_codes() {
        assert_eq!(
            ServerError::Config("bad".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServerError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
