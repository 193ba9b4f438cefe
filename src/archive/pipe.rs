use axum::body::boxed;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use hyper::body::{Bytes, Sender};
use hyper::{Body, StatusCode};
use tokio::io::{self, AsyncReadExt, DuplexStream};
use tokio::sync::oneshot;

use super::{content_headers, write_archive, ArchiveConfig};
use crate::error::{archive as ArchiveError, Error};
use crate::storage::SourceDir;

pub(super) async fn handler(
    Extension(config): Extension<ArchiveConfig>,
    Extension(dir): Extension<SourceDir>,
) -> Response {
    (
        StatusCode::OK,
        content_headers(),
        boxed(stream_archive(config, dir)),
    )
        .into_response()
}

/// Spawns the producer/consumer pair around a bounded in-memory pipe and
/// returns the response body fed by the consumer. A slow client suspends
/// the consumer, a full pipe suspends the producer, so the whole request
/// never holds more than a couple of chunks in memory, whatever the total
/// archive size.
pub(super) fn stream_archive(config: ArchiveConfig, dir: SourceDir) -> Body {
    let (response, body) = Body::channel();
    let (pipe_writer, pipe_reader) = io::duplex(config.chunk_size);
    let (failure_sender, failure_receiver) = oneshot::channel();

    let chunk_size = config.chunk_size;
    let producer = tokio::spawn(produce(config, dir, pipe_writer, failure_sender));
    let consumer = tokio::spawn(consume(pipe_reader, response, chunk_size, failure_receiver));
    tokio::spawn(async move {
        // Completion barrier: the request is only settled once both stages
        // have stopped, cleanly or not.
        match tokio::join!(producer, consumer) {
            (Ok(Ok(())), Ok(Ok(()))) => log::debug!("Archive streaming completed"),
            (producer, consumer) => log::error!(
                "Archive streaming failed: producer: {:?}, consumer: {:?}",
                producer,
                consumer
            ),
        }
    });
    body
}

async fn produce(
    config: ArchiveConfig,
    dir: SourceDir,
    mut pipe: DuplexStream,
    failure: oneshot::Sender<Error>,
) -> Result<(), Error> {
    match write_archive(&config, &dir, &mut pipe).await {
        Ok(()) => Ok(()),
        Err(err) => {
            // The marker must be in place before the write end closes, so
            // the consumer can tell an aborted stream from a clean end.
            let _ = failure.send(err.clone());
            drop(pipe);
            Err(err)
        }
    }
}

async fn consume(
    mut pipe: DuplexStream,
    mut response: Sender,
    chunk_size: usize,
    mut failure: oneshot::Receiver<Error>,
) -> Result<(), Error> {
    let mut chunk = vec![0; chunk_size];
    loop {
        let read = pipe
            .read(&mut chunk)
            .await
            .map_err(|_| ArchiveError::PipeBroken)?;
        if read == 0 {
            break;
        }
        if response
            .send_data(Bytes::copy_from_slice(&chunk[..read]))
            .await
            .is_err()
        {
            // Client went away; dropping the read end unblocks the producer.
            return Err(ArchiveError::ResponseWrite);
        }
    }
    match failure.try_recv() {
        Ok(err) => {
            response.abort();
            Err(err)
        }
        Err(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hyper::body;
    use tokio::io;
    use tokio::sync::oneshot;
    use tokio::time::timeout;

    use super::{produce, stream_archive};
    use crate::archive::entry_name;
    use crate::archive::testing::{config, decode, sources};

    #[tokio::test]
    async fn streams_all_entries() {
        let (_root, dir) = sources(10).await;
        let bytes = body::to_bytes(stream_archive(config(10), dir.clone()))
            .await
            .unwrap();

        let entries = decode(&bytes);
        assert_eq!(entries.len(), 10);
        for (index, (name, content)) in entries.iter().enumerate() {
            assert_eq!(name, &entry_name(index));
            let source = tokio::fs::read(dir.file_path(index)).await.unwrap();
            assert_eq!(content, &source);
        }
    }

    #[tokio::test]
    async fn empty_archive() {
        let (_root, dir) = sources(0).await;
        let bytes = body::to_bytes(stream_archive(config(0), dir)).await.unwrap();
        assert!(decode(&bytes).is_empty());
    }

    #[tokio::test]
    async fn aborts_on_missing_source() {
        // Two sources on disk, four announced: the producer fails mid-stream
        // and the response body must terminate with an error, promptly.
        let (_root, dir) = sources(2).await;
        let body = stream_archive(config(4), dir);
        let collected = timeout(Duration::from_secs(5), body::to_bytes(body))
            .await
            .expect("consumer did not terminate");
        assert!(collected.is_err());
    }

    #[tokio::test]
    async fn producer_stops_without_reader() {
        let (_root, dir) = sources(2).await;
        let (pipe_writer, pipe_reader) = io::duplex(1024);
        drop(pipe_reader);

        let (failure_sender, _failure_receiver) = oneshot::channel();
        let result = timeout(
            Duration::from_secs(5),
            produce(config(2), dir, pipe_writer, failure_sender),
        )
        .await
        .expect("producer did not terminate");
        assert!(result.is_err());
    }
}
