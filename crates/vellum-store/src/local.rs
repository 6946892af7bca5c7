use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::error::{StoreError, StoreResult};
use crate::key::ObjectKey;
use crate::traits::{ContentStore, FetchOutcome};

/// Content store keeping one file per object at `<root>/<client>/<object-id>`.
#[derive(Clone, Debug)]
pub struct LocalContentStore {
    root: PathBuf,
}

impl LocalContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`'s body.
    pub fn object_path(&self, key: &ObjectKey) -> StoreResult<PathBuf> {
        if !key.client().is_path_safe() {
            return Err(StoreError::InvalidKey(key.clone()));
        }
        Ok(self
            .root
            .join(key.client().as_str())
            .join(key.object().to_string()))
    }
}

#[async_trait]
impl ContentStore for LocalContentStore {
    async fn fetch(
        &self,
        key: &ObjectKey,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
        cancel: &CancellationToken,
    ) -> StoreResult<FetchOutcome> {
        let path = self.object_path(key)?;
        let mut file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(FetchOutcome::Missing),
            Err(e) => return Err(e.into()),
        };

        let bytes_written = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StoreError::Cancelled),
            res = tokio::io::copy(&mut file, &mut *sink) => res?,
        };
        sink.flush().await?;
        tracing::debug!(%key, bytes = bytes_written, "streamed object from disk");
        Ok(FetchOutcome::Found { bytes_written })
    }
}
