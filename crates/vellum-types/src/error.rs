use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidUuid(String),

    #[error("unsupported object id version: expected 4, got {0}")]
    UnsupportedVersion(usize),

    #[error("reserved object id: {0}")]
    Reserved(String),

    #[error("empty object id")]
    Empty,

    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}
