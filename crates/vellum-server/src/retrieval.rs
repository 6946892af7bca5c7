//! Object retrieval flow.
//!
//! [`Retriever::retrieve`] walks one request through identifier validation,
//! the sample-object short circuit, index lookup, descriptor match, header
//! construction, and finally the store fetch. Headers are fixed before the
//! fetch starts and travel with the body in [`Retrieval`], so nothing can
//! change them once bytes are flowing.

use std::borrow::Cow;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use tokio_util::sync::CancellationToken;

use vellum_index::IndexResolver;
use vellum_store::{ContentStore, FetchOutcome, ObjectKey, StoreError, StoreResult};
use vellum_types::{
    classify, format_http_date, ClientId, IdentifierClass, ObjectDescriptor, TypeError,
};

use crate::config::RetrievalConfig;
use crate::error::RetrievalError;
use crate::sink::{content_channel, ChannelSink, ContentStream};

pub const OBJECT_DATE_HEADER: &str = "x-object-date";
pub const OBJECT_TITLE_HEADER: &str = "x-object-title";

pub const SAMPLE_OBJECT_TITLE: &str = "Sample object";
pub const SAMPLE_OBJECT_BODY: &str = "# This is a sample object
It works!

And this is **Markdown** that is being rendered for you.
";

/// One retrieval, as handed over by the HTTP layer.
#[derive(Clone, Debug)]
pub struct RetrievalRequest {
    /// Raw identifier from the path, not yet validated.
    pub object_id: String,
    /// Caller identity resolved by authentication, if any.
    pub client: Option<ClientId>,
    /// Fires when the caller goes away; threaded into the store fetch.
    pub cancel: CancellationToken,
}

impl RetrievalRequest {
    pub fn new(object_id: impl Into<String>, client: Option<ClientId>) -> Self {
        Self {
            object_id: object_id.into(),
            client,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Metadata headers of a successful retrieval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectHeaders {
    date: HeaderValue,
    title: HeaderValue,
}

impl ObjectHeaders {
    /// Titles are sent unescaped. Line breaks and other control characters
    /// cannot appear in a header value and are replaced with spaces.
    pub fn new(date: &str, title: &str) -> Result<Self, RetrievalError> {
        let date = HeaderValue::from_str(date)
            .map_err(|e| RetrievalError::InvalidHeader(format!("{OBJECT_DATE_HEADER}: {e}")))?;
        let title = HeaderValue::from_bytes(&header_safe(title))
            .map_err(|e| RetrievalError::InvalidHeader(format!("{OBJECT_TITLE_HEADER}: {e}")))?;
        Ok(Self { date, title })
    }

    fn for_descriptor(descriptor: &ObjectDescriptor) -> Result<Self, RetrievalError> {
        let date = descriptor
            .http_date()
            .map_err(|e| RetrievalError::InvalidHeader(e.to_string()))?;
        Self::new(&date, &descriptor.title)
    }

    pub fn date(&self) -> &HeaderValue {
        &self.date
    }

    pub fn title(&self) -> &HeaderValue {
        &self.title
    }

    pub fn date_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.date.as_bytes())
    }

    pub fn title_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.title.as_bytes())
    }
}

fn header_safe(text: &str) -> Vec<u8> {
    text.bytes()
        .map(|b| match b {
            b'\t' => b,
            0x00..=0x1f | 0x7f => b' ',
            _ => b,
        })
        .collect()
}

pub enum ObjectBody {
    Sample(&'static str),
    Stream(ContentStream),
}

impl std::fmt::Debug for ObjectBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sample(_) => f.write_str("ObjectBody::Sample"),
            Self::Stream(_) => f.write_str("ObjectBody::Stream"),
        }
    }
}

/// A committed retrieval: headers plus a body that may still be streaming.
#[derive(Debug)]
pub struct Retrieval {
    pub headers: ObjectHeaders,
    pub body: ObjectBody,
}

/// Sequences index and store lookups for object retrievals.
///
/// Holds no per-request state; one instance serves all requests concurrently.
pub struct Retriever {
    index: Arc<dyn IndexResolver>,
    store: Arc<dyn ContentStore>,
    config: RetrievalConfig,
}

impl Retriever {
    pub fn new(
        index: Arc<dyn IndexResolver>,
        store: Arc<dyn ContentStore>,
        config: RetrievalConfig,
    ) -> Self {
        Self { index, store, config }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub async fn retrieve(&self, request: RetrievalRequest) -> Result<Retrieval, RetrievalError> {
        let object_id = match classify(&request.object_id) {
            IdentifierClass::Empty => {
                return Err(RetrievalError::InvalidIdentifier(TypeError::Empty));
            }
            IdentifierClass::Sentinel => return self.sample().await,
            IdentifierClass::Malformed(e) => {
                tracing::debug!(raw = %request.object_id, error = %e, "rejected object id");
                return Err(RetrievalError::InvalidIdentifier(e));
            }
            IdentifierClass::Valid(id) => id,
        };

        let client = request.client.ok_or(RetrievalError::MissingClientIdentity)?;

        let index = self.index.lookup(&client).await.map_err(|e| {
            tracing::warn!(%client, error = %e, "index lookup failed");
            RetrievalError::IndexUnavailable(e)
        })?;
        // Matches on the parsed UUID, not the raw request text.
        let Some(descriptor) = index.find(&object_id) else {
            tracing::debug!(%client, %object_id, "object not in index");
            return Err(RetrievalError::ObjectNotFound);
        };
        let headers = ObjectHeaders::for_descriptor(descriptor)?;

        let key = ObjectKey::new(client, object_id);
        let body = self.stream(key, request.cancel).await?;
        Ok(Retrieval {
            headers,
            body: ObjectBody::Stream(body),
        })
    }

    async fn sample(&self) -> Result<Retrieval, RetrievalError> {
        tokio::time::sleep(self.config.sample_delay).await;
        let date = format_http_date(chrono::Utc::now());
        Ok(Retrieval {
            headers: ObjectHeaders::new(&date, SAMPLE_OBJECT_TITLE)?,
            body: ObjectBody::Sample(SAMPLE_OBJECT_BODY),
        })
    }

    /// Start the fetch and wait until the response can be committed: either
    /// the first byte reached the body, or the fetch ended without writing.
    async fn stream(
        &self,
        key: ObjectKey,
        cancel: CancellationToken,
    ) -> Result<ContentStream, RetrievalError> {
        // Dropping this future or the returned stream cancels the fetch.
        let (sink, committed, stream) =
            content_channel(self.config.stream_buffer, cancel.clone().drop_guard());

        let store = Arc::clone(&self.store);
        let deadline = self.config.fetch_timeout;
        let task = tokio::spawn(fetch_into(store, key, sink, cancel, deadline));

        if committed.await.is_ok() {
            return Ok(stream);
        }

        // The sink was dropped before any byte was written.
        let outcome = task
            .await
            .map_err(|e| StoreError::Io(io::Error::other(e.to_string())))??;
        match outcome {
            FetchOutcome::Found { .. } => Ok(stream),
            FetchOutcome::Missing => Err(RetrievalError::ObjectNotFound),
        }
    }
}

async fn fetch_into(
    store: Arc<dyn ContentStore>,
    key: ObjectKey,
    mut sink: ChannelSink,
    cancel: CancellationToken,
    deadline: Option<Duration>,
) -> StoreResult<FetchOutcome> {
    let fetch = store.fetch(&key, &mut sink, &cancel);
    let result = match deadline {
        None => fetch.await,
        Some(limit) => match tokio::time::timeout(limit, fetch).await {
            Ok(result) => result,
            Err(_) => {
                cancel.cancel();
                Err(StoreError::DeadlineExceeded(limit))
            }
        },
    };

    match &result {
        Ok(FetchOutcome::Found { bytes_written }) => {
            tracing::debug!(%key, bytes = bytes_written, "object streamed");
        }
        Ok(FetchOutcome::Missing) => {
            tracing::warn!(%key, "object indexed but missing from store");
        }
        Err(e) if sink.is_committed() => {
            tracing::warn!(%key, error = %e, "store failed after response was committed");
            sink.abort(io::Error::other(e.to_string())).await;
        }
        Err(e) => {
            tracing::warn!(%key, error = %e, "store read failed");
        }
    }
    result
}
