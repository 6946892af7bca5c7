use async_trait::async_trait;
use vellum_types::ClientId;

use crate::error::IndexResult;
use crate::index::ClientIndex;

/// Source of per-client object indexes.
///
/// Implementations must satisfy these invariants:
/// - The returned [`ClientIndex`] is a snapshot; later changes to the backing
///   service never show through it.
/// - A client with no objects yields an empty index, not an error.
/// - Errors mean the index could not be produced at all.
#[async_trait]
pub trait IndexResolver: Send + Sync {
    /// Resolve the current index for `client`.
    async fn lookup(&self, client: &ClientId) -> IndexResult<ClientIndex>;
}
