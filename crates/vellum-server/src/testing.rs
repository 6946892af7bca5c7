//! Shared fixtures for the server's tests.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use vellum_index::{ClientIndex, IndexError, IndexResolver, IndexResult, InMemoryIndexResolver};
use vellum_store::{ContentStore, FetchOutcome, InMemoryContentStore, ObjectKey, StoreError, StoreResult};
use vellum_types::{ClientId, ObjectDescriptor, ObjectId};

use crate::auth::AllowAllAuth;
use crate::config::RetrievalConfig;
use crate::retrieval::Retriever;
use crate::router::{build_router, AppState};

pub fn client() -> ClientId {
    ClientId::new("acme")
}

pub struct CountingIndex {
    pub inner: InMemoryIndexResolver,
    pub calls: AtomicUsize,
}

#[async_trait]
impl IndexResolver for CountingIndex {
    async fn lookup(&self, client: &ClientId) -> IndexResult<ClientIndex> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup(client).await
    }
}

pub struct CountingStore {
    pub inner: InMemoryContentStore,
    pub calls: AtomicUsize,
}

#[async_trait]
impl ContentStore for CountingStore {
    async fn fetch(
        &self,
        key: &ObjectKey,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
        cancel: &CancellationToken,
    ) -> StoreResult<FetchOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(key, sink, cancel).await
    }
}

/// In-memory index and store that count how often they are consulted.
pub struct Fixture {
    pub index: Arc<CountingIndex>,
    pub store: Arc<CountingStore>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            index: Arc::new(CountingIndex {
                inner: InMemoryIndexResolver::new(),
                calls: AtomicUsize::new(0),
            }),
            store: Arc::new(CountingStore {
                // Small chunks so bodies span many channel items.
                inner: InMemoryContentStore::with_chunk_size(4096),
                calls: AtomicUsize::new(0),
            }),
        }
    }

    pub fn retriever(&self) -> Retriever {
        self.retriever_with(RetrievalConfig::immediate())
    }

    pub fn retriever_with(&self, config: RetrievalConfig) -> Retriever {
        Retriever::new(self.index.clone(), self.store.clone(), config)
    }

    /// Router authenticating every bearer token as the client of that name.
    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(Arc::new(self.retriever()), Arc::new(AllowAllAuth)))
    }

    /// Index and store an object for [`client()`].
    pub fn put(&self, title: &str, date: i64, body: Vec<u8>) -> ObjectId {
        self.put_for(&client(), title, date, body)
    }

    pub fn put_for(&self, client: &ClientId, title: &str, date: i64, body: Vec<u8>) -> ObjectId {
        let id = ObjectId::new_random();
        self.index
            .inner
            .insert(client, ObjectDescriptor::new(id, title, date));
        self.store
            .inner
            .insert(ObjectKey::new(client.clone(), id), body);
        id
    }
}

pub struct FailingIndex;

#[async_trait]
impl IndexResolver for FailingIndex {
    async fn lookup(&self, _client: &ClientId) -> IndexResult<ClientIndex> {
        Err(IndexError::Unavailable("index service down".into()))
    }
}

enum Then {
    Fail,
    Hang(Mutex<Option<oneshot::Sender<()>>>),
}

/// Store that writes a fixed prefix for every key, then fails or hangs.
pub struct ScriptedStore {
    prefix: Vec<u8>,
    then: Then,
}

impl ScriptedStore {
    pub fn fail_after(prefix: Vec<u8>) -> Self {
        Self { prefix, then: Then::Fail }
    }

    /// Hangs until cancelled; the receiver resolves once cancellation was seen.
    pub fn hang_after(prefix: Vec<u8>) -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        let store = Self {
            prefix,
            then: Then::Hang(Mutex::new(Some(tx))),
        };
        (store, rx)
    }
}

#[async_trait]
impl ContentStore for ScriptedStore {
    async fn fetch(
        &self,
        _key: &ObjectKey,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
        cancel: &CancellationToken,
    ) -> StoreResult<FetchOutcome> {
        if !self.prefix.is_empty() {
            sink.write_all(&self.prefix).await?;
        }
        match &self.then {
            Then::Fail => Err(StoreError::Io(io::Error::other("backend exploded"))),
            Then::Hang(seen) => {
                cancel.cancelled().await;
                let tx = seen.lock().expect("lock poisoned").take();
                if let Some(tx) = tx {
                    let _ = tx.send(());
                }
                Err(StoreError::Cancelled)
            }
        }
    }
}
