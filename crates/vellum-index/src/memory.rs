use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use vellum_types::{ClientId, ObjectDescriptor};

use crate::error::IndexResult;
use crate::index::ClientIndex;
use crate::traits::IndexResolver;

/// In-memory, HashMap-based index resolver.
///
/// Intended for tests and embedding. Lookups clone the client's descriptors,
/// so each caller receives an independent snapshot.
pub struct InMemoryIndexResolver {
    indexes: RwLock<HashMap<ClientId, Vec<ObjectDescriptor>>>,
}

impl InMemoryIndexResolver {
    pub fn new() -> Self {
        Self {
            indexes: RwLock::new(HashMap::new()),
        }
    }

    /// Append a descriptor to the client's index.
    pub fn insert(&self, client: &ClientId, descriptor: ObjectDescriptor) {
        self.indexes
            .write()
            .expect("lock poisoned")
            .entry(client.clone())
            .or_default()
            .push(descriptor);
    }

    /// Replace the client's whole index.
    pub fn set(&self, client: &ClientId, descriptors: Vec<ObjectDescriptor>) {
        self.indexes
            .write()
            .expect("lock poisoned")
            .insert(client.clone(), descriptors);
    }

    /// Number of clients with an index.
    pub fn client_count(&self) -> usize {
        self.indexes.read().expect("lock poisoned").len()
    }
}

impl Default for InMemoryIndexResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndexResolver for InMemoryIndexResolver {
    async fn lookup(&self, client: &ClientId) -> IndexResult<ClientIndex> {
        let map = self.indexes.read().expect("lock poisoned");
        Ok(map.get(client).cloned().unwrap_or_default().into())
    }
}

impl std::fmt::Debug for InMemoryIndexResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryIndexResolver")
            .field("client_count", &self.client_count())
            .finish()
    }
}
