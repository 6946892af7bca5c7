//! Error types for the index crate.

use vellum_types::ClientId;

/// Errors that can occur while resolving a client's index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The client id cannot be used to address an index.
    #[error("invalid client id: {0:?}")]
    InvalidClient(ClientId),

    /// The index exists but could not be decoded.
    #[error("corrupt index for {client}: {reason}")]
    Corrupt { client: ClientId, reason: String },

    /// The backing service could not be reached.
    #[error("index unavailable: {0}")]
    Unavailable(String),

    /// I/O error from the underlying storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
