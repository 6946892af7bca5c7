use async_trait::async_trait;
use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;

use crate::error::StoreResult;
use crate::key::ObjectKey;

/// Outcome of a completed fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The object existed and its body was written to the sink.
    Found { bytes_written: u64 },
    /// The store has no object under the key. Nothing was written.
    Missing,
}

/// Streaming, client-scoped content store.
///
/// All implementations must satisfy these invariants:
/// - `Missing` is reported before any byte is written to the sink.
/// - On `Found`, the sink received exactly `bytes_written` bytes, in order.
/// - The fetch observes `cancel` between writes and returns
///   [`StoreError::Cancelled`](crate::StoreError::Cancelled) once it fires.
/// - Errors from the sink are returned, not retried.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Copy the body stored under `key` into `sink`.
    async fn fetch(
        &self,
        key: &ObjectKey,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
        cancel: &CancellationToken,
    ) -> StoreResult<FetchOutcome>;
}
