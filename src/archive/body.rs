use std::io::{Error as IoError, ErrorKind};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::ready;
use hyper::body::{Bytes, Sender};
use tokio::io::AsyncWrite;

/// `AsyncWrite` adapter turning an HTTP response body sender into a byte
/// sink the archive encoder can write to directly.
pub(super) struct BodyWriter(Sender);

impl BodyWriter {
    pub(super) fn new(sender: Sender) -> Self {
        Self(sender)
    }

    /// Terminates the body abnormally, leaving the client with a truncated
    /// chunked response.
    pub(super) fn abort(self) {
        self.0.abort();
    }
}

impl AsyncWrite for BodyWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize, IoError>> {
        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }
        if ready!(self.0.poll_ready(cx)).is_err() {
            // Client disconnected.
            return Poll::Ready(Err(ErrorKind::BrokenPipe.into()));
        }
        match self.0.try_send_data(Bytes::copy_from_slice(buf)) {
            Ok(()) => Poll::Ready(Ok(buf.len())),
            Err(_) => Poll::Ready(Err(ErrorKind::BrokenPipe.into())),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), IoError>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), IoError>> {
        Poll::Ready(Ok(()))
    }
}
