use axum::routing::get;
use axum::{Extension, Router};
use hyper::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use hyper::http::HeaderValue;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufReader};
use zipit::{Archive, FileDateTime};

use crate::error::{archive as ArchiveError, Error};
use crate::storage::SourceDir;

mod body;
mod buffered;
mod direct;
mod pipe;

/// Tunables shared by the three archiving strategies.
#[derive(Clone, Debug)]
pub struct ArchiveConfig {
    pub source_count: usize,
    pub chunk_size: usize,
}

pub fn router(config: ArchiveConfig, dir: SourceDir) -> Router {
    Router::new()
        .route("/all-content", get(buffered::handler))
        .route("/stream/pipe", get(pipe::handler))
        .route("/stream/resp", get(direct::handler))
        .route_layer(Extension(config))
        .route_layer(Extension(dir))
}

fn entry_name(index: usize) -> String {
    format!("test/{}.txt", index)
}

fn content_headers() -> [(HeaderName, HeaderValue); 2] {
    [
        (CONTENT_TYPE, HeaderValue::from_static("application/zip")),
        (
            CONTENT_DISPOSITION,
            HeaderValue::from_static(r#"attachment; filename="test.zip""#),
        ),
    ]
}

/// Writes one entry per source file into `sink`, in enumeration order, each
/// payload exactly once, then the archive's trailer, then shuts the sink
/// down. Every strategy drives this same loop; only the sink differs.
async fn write_archive<W>(config: &ArchiveConfig, dir: &SourceDir, sink: W) -> Result<(), Error>
where
    W: AsyncWrite + Unpin,
{
    let mut archive = Archive::new(sink);
    for index in 0..config.source_count {
        let file = dir.open(index).await.map_err(|err| {
            log::error!("Failed to open source file {}: {}", index, err);
            ArchiveError::OpenSource
        })?;
        log::debug!("Appending source file {} to archive", index);
        let mut source = BufReader::with_capacity(config.chunk_size, file);
        archive
            .append(entry_name(index), FileDateTime::now(), &mut source)
            .await
            .map_err(|err| {
                log::error!("Failed to append source file {} to archive: {}", index, err);
                ArchiveError::AppendEntry
            })?;
        // Read handle released here, before the next entry starts.
    }
    let mut sink = archive.finalize().await.map_err(|err| {
        log::error!("Failed to write archive's completion data: {}", err);
        ArchiveError::FinalizeArchive
    })?;
    sink.shutdown().await.map_err(|err| {
        log::error!("Failed to close archive output: {}", err);
        ArchiveError::FinalizeArchive
    })?;
    Ok(())
}
