//! Bridge between a store fetch and a streaming response body.
//!
//! The fetch writes into a [`ChannelSink`]; the response reads from the
//! matching [`ContentStream`]. The sink reports the moment the first byte is
//! handed over, which is the point where the response is committed.

use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use bytes::Bytes;
use tokio::io::AsyncWrite;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::Stream;
use tokio_util::sync::{DropGuard, PollSender};

type Chunk = io::Result<Bytes>;

/// Create a connected sink/stream pair buffering at most `capacity` chunks.
///
/// The returned receiver resolves once the first byte reaches the stream, or
/// fails if the sink is dropped without ever writing. `guard` is held by the
/// stream, so dropping the stream cancels whatever it guards.
pub fn content_channel(
    capacity: usize,
    guard: DropGuard,
) -> (ChannelSink, oneshot::Receiver<()>, ContentStream) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let (commit_tx, commit_rx) = oneshot::channel();
    let sink = ChannelSink {
        tx: PollSender::new(tx),
        commit: Some(commit_tx),
    };
    let stream = ContentStream { rx, _guard: guard };
    (sink, commit_rx, stream)
}

/// Write half: an [`AsyncWrite`] that forwards every write as one chunk.
pub struct ChannelSink {
    tx: PollSender<Chunk>,
    commit: Option<oneshot::Sender<()>>,
}

impl ChannelSink {
    /// Returns `true` once at least one byte has been handed to the stream.
    pub fn is_committed(&self) -> bool {
        self.commit.is_none()
    }

    /// Terminate the stream with an error so the transfer fails visibly
    /// instead of ending as if complete.
    pub async fn abort(mut self, err: io::Error) {
        self.tx.abort_send();
        if let Some(tx) = self.tx.get_ref() {
            // The reader may already be gone.
            let _ = tx.send(Err(err)).await;
        }
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "response body closed")
}

impl AsyncWrite for ChannelSink {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }
        ready!(self.tx.poll_reserve(cx)).map_err(|_| closed())?;
        self.tx
            .send_item(Ok(Bytes::copy_from_slice(buf)))
            .map_err(|_| closed())?;
        if let Some(commit) = self.commit.take() {
            let _ = commit.send(());
        }
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.tx.close();
        Poll::Ready(Ok(()))
    }
}

/// Read half: the response body.
pub struct ContentStream {
    rx: mpsc::Receiver<Chunk>,
    _guard: DropGuard,
}

impl Stream for ContentStream {
    type Item = Chunk;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl std::fmt::Debug for ContentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStream").finish_non_exhaustive()
    }
}
