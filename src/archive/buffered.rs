use std::io::Cursor;

use axum::response::{IntoResponse, Response};
use axum::Extension;
use hyper::header::CONTENT_LENGTH;
use hyper::http::HeaderValue;
use hyper::StatusCode;

use super::{content_headers, write_archive, ArchiveConfig};
use crate::error::Error;
use crate::storage::SourceDir;

pub(super) async fn handler(
    Extension(config): Extension<ArchiveConfig>,
    Extension(dir): Extension<SourceDir>,
) -> Result<Response, Error> {
    let archive = process_archive(&config, &dir).await?;
    Ok((
        StatusCode::OK,
        content_headers(),
        [(CONTENT_LENGTH, HeaderValue::from(archive.len() as u64))],
        archive,
    )
        .into_response())
}

/// Materializes the whole archive in memory before any response byte is
/// sent: failures yield a clean error response instead of a truncated body,
/// at a memory cost linear in the total payload size.
pub(super) async fn process_archive(
    config: &ArchiveConfig,
    dir: &SourceDir,
) -> Result<Vec<u8>, Error> {
    let mut buffer = Cursor::new(Vec::new());
    write_archive(config, dir, &mut buffer).await?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::process_archive;
    use crate::archive::testing::{config, sources};
    use crate::error::Error;

    #[tokio::test]
    async fn missing_source_fails_cleanly() {
        // One source on disk, three announced: the whole response is dropped
        // before a single byte reaches the client.
        let (_root, dir) = sources(1).await;
        let result = process_archive(&config(3), &dir).await;
        assert_eq!(result.unwrap_err(), Error::OpenSource);
    }
}
