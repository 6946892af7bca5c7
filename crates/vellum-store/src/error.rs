use std::time::Duration;

use crate::key::ObjectKey;

/// Errors from content store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key cannot be mapped onto the backend's namespace.
    #[error("invalid object key: {0}")]
    InvalidKey(ObjectKey),

    /// The fetch was cancelled before it completed.
    #[error("fetch cancelled")]
    Cancelled,

    /// The fetch did not complete within its deadline.
    #[error("fetch exceeded deadline of {0:?}")]
    DeadlineExceeded(Duration),

    /// I/O error from the backend or the sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
