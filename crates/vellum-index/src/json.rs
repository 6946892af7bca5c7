use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use vellum_types::{ClientId, ObjectDescriptor};

use crate::error::{IndexError, IndexResult};
use crate::index::ClientIndex;
use crate::traits::IndexResolver;

/// File name of a client's index inside its directory.
pub const INDEX_FILE_NAME: &str = "index.json";

/// Resolver reading one JSON array of descriptors per client from
/// `<root>/<client>/index.json`.
///
/// A missing file means the client has no objects yet.
#[derive(Clone, Debug)]
pub struct JsonIndexResolver {
    root: PathBuf,
}

impl JsonIndexResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the index file for `client`.
    pub fn index_path(&self, client: &ClientId) -> IndexResult<PathBuf> {
        if !client.is_path_safe() {
            return Err(IndexError::InvalidClient(client.clone()));
        }
        Ok(self.root.join(client.as_str()).join(INDEX_FILE_NAME))
    }
}

#[async_trait]
impl IndexResolver for JsonIndexResolver {
    async fn lookup(&self, client: &ClientId) -> IndexResult<ClientIndex> {
        let path = self.index_path(client)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(%client, path = %path.display(), "no index file");
                return Ok(ClientIndex::default());
            }
            Err(e) => return Err(e.into()),
        };
        let raw: Vec<serde_json::Value> =
            serde_json::from_slice(&bytes).map_err(|e| IndexError::Corrupt {
                client: client.clone(),
                reason: e.to_string(),
            })?;
        let entries = parse_entries(client, raw);
        tracing::debug!(%client, entries = entries.len(), "loaded index");
        Ok(entries.into())
    }
}

/// Decode entries one by one. An entry that is not a valid descriptor can
/// never match a request, so it is skipped instead of failing the client.
fn parse_entries(client: &ClientId, raw: Vec<serde_json::Value>) -> Vec<ObjectDescriptor> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value(value.clone()) {
            Ok(descriptor) => Some(descriptor),
            Err(e) => {
                tracing::warn!(%client, raw = %value, error = %e, "skipping unreadable index entry");
                None
            }
        })
        .collect()
}
