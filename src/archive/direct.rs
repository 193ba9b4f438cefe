use axum::body::boxed;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use hyper::{Body, StatusCode};

use super::body::BodyWriter;
use super::{content_headers, write_archive, ArchiveConfig};
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

/// Drives the encoder straight into the response body, no pipe and no
/// second task: compression advances only as fast as the client reads.
pub(super) fn stream_archive(config: ArchiveConfig, dir: SourceDir) -> Body {
    let (response, body) = Body::channel();
    tokio::spawn(async move {
        let mut writer = BodyWriter::new(response);
        match write_archive(&config, &dir, &mut writer).await {
            Ok(()) => log::debug!("Direct archive streaming completed"),
            Err(err) => {
                log::error!("Direct archive streaming failed: {}", err);
                // Abort so the client sees the truncation instead of a
                // well-terminated chunked body.
                writer.abort();
            }
        }
    });
    body
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hyper::body;
    use tokio::time::timeout;

    use super::stream_archive;
    use crate::archive::entry_name;
    use crate::archive::testing::{config, decode, sources};

    #[tokio::test]
    async fn streams_all_entries() {
        let (_root, dir) = sources(3).await;
        let bytes = body::to_bytes(stream_archive(config(3), dir.clone()))
            .await
            .unwrap();

        let entries = decode(&bytes);
        assert_eq!(entries.len(), 3);
        for (index, (name, content)) in entries.iter().enumerate() {
            assert_eq!(name, &entry_name(index));
            let source = tokio::fs::read(dir.file_path(index)).await.unwrap();
            assert_eq!(content, &source);
        }
    }

    #[tokio::test]
    async fn aborts_on_missing_source() {
        let (_root, dir) = sources(1).await;
        let body = stream_archive(config(2), dir);
        let collected = timeout(Duration::from_secs(5), body::to_bytes(body))
            .await
            .expect("stream did not terminate");
        assert!(collected.is_err());
    }
}
