use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::error::{StoreError, StoreResult};
use crate::key::ObjectKey;
use crate::traits::{ContentStore, FetchOutcome};

/// Chunk size used when writing bodies into the sink.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// In-memory, HashMap-based content store.
///
/// Intended for tests and embedding. Bodies are held as [`Bytes`], so a fetch
/// only clones a reference-counted handle before streaming.
pub struct InMemoryContentStore {
    objects: RwLock<HashMap<ObjectKey, Bytes>>,
    chunk_size: usize,
}

impl InMemoryContentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Create a store that writes bodies in chunks of `chunk_size` bytes.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            chunk_size: chunk_size.max(1),
        }
    }

    /// Store (or replace) a body.
    pub fn insert(&self, key: ObjectKey, body: impl Into<Bytes>) {
        self.objects
            .write()
            .expect("lock poisoned")
            .insert(key, body.into());
    }

    /// Remove a body. Returns `true` if it existed.
    pub fn remove(&self, key: &ObjectKey) -> bool {
        self.objects
            .write()
            .expect("lock poisoned")
            .remove(key)
            .is_some()
    }

    /// Number of bodies currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    fn get(&self, key: &ObjectKey) -> Option<Bytes> {
        self.objects.read().expect("lock poisoned").get(key).cloned()
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn fetch(
        &self,
        key: &ObjectKey,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
        cancel: &CancellationToken,
    ) -> StoreResult<FetchOutcome> {
        let Some(body) = self.get(key) else {
            return Ok(FetchOutcome::Missing);
        };

        let mut bytes_written = 0u64;
        for chunk in body.chunks(self.chunk_size) {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(StoreError::Cancelled),
                res = sink.write_all(chunk) => res?,
            }
            bytes_written += chunk.len() as u64;
        }
        sink.flush().await?;
        Ok(FetchOutcome::Found { bytes_written })
    }
}

impl std::fmt::Debug for InMemoryContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryContentStore")
            .field("object_count", &self.len())
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_types::{ClientId, ObjectId};

    fn key(client: &str) -> ObjectKey {
        ObjectKey::new(ClientId::new(client), ObjectId::new_random())
    }

    #[tokio::test]
    async fn fetch_present_object() {
        let store = InMemoryContentStore::with_chunk_size(3);
        let k = key("acme");
        store.insert(k.clone(), &b"hello world"[..]);

        let mut sink = Vec::new();
        let outcome = store.fetch(&k, &mut sink, &CancellationToken::new()).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Found { bytes_written: 11 });
        assert_eq!(sink, b"hello world");
    }

    #[tokio::test]
    async fn fetch_missing_object_writes_nothing() {
        let store = InMemoryContentStore::new();
        let mut sink = Vec::new();
        let outcome = store
            .fetch(&key("acme"), &mut sink, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome, FetchOutcome::Missing);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn keys_are_client_scoped() {
        let store = InMemoryContentStore::new();
        let id = ObjectId::new_random();
        store.insert(ObjectKey::new(ClientId::new("a"), id), "secret");

        let mut sink = Vec::new();
        let other = ObjectKey::new(ClientId::new("b"), id);
        let outcome = store.fetch(&other, &mut sink, &CancellationToken::new()).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Missing);
    }

    #[tokio::test]
    async fn empty_body_is_found() {
        let store = InMemoryContentStore::new();
        let k = key("acme");
        store.insert(k.clone(), Bytes::new());
        let mut sink = Vec::new();
        let outcome = store.fetch(&k, &mut sink, &CancellationToken::new()).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Found { bytes_written: 0 });
    }

    #[tokio::test]
    async fn cancelled_fetch_aborts() {
        let store = InMemoryContentStore::new();
        let k = key("acme");
        store.insert(k.clone(), vec![7u8; 1024]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut sink = Vec::new();
        let err = store.fetch(&k, &mut sink, &cancel).await.unwrap_err();
        assert!(matches!(err, StoreError::Cancelled));
        assert!(sink.is_empty());
    }

    #[test]
    fn insert_and_remove() {
        let store = InMemoryContentStore::new();
        let k = key("acme");
        assert!(store.is_empty());
        store.insert(k.clone(), "x");
        assert_eq!(store.len(), 1);
        assert!(store.remove(&k));
        assert!(!store.remove(&k));
    }
}
