use std::io;

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use super::SourceDir;

const WRITE_CHUNK: usize = 1024 * 1024;

/// Fill the source directory with `count` files of exactly `size` bytes,
/// each made of its index's decimal digits repeated. Writes are chunked so
/// generation itself stays within a constant memory footprint.
pub async fn generate(dir: &SourceDir, count: usize, size: u64) -> io::Result<()> {
    fs::create_dir_all(dir.path()).await?;
    for index in 0..count {
        let mut file = File::create(dir.file_path(index)).await?;
        let pattern = index.to_string().into_bytes();
        // Chunk length is a multiple of the pattern so the repetition stays
        // aligned across chunk boundaries.
        let chunk = pattern.repeat((WRITE_CHUNK / pattern.len()).max(1));

        let mut remaining = size;
        while remaining > 0 {
            let len = (remaining as usize).min(chunk.len());
            file.write_all(&chunk[..len]).await?;
            remaining -= len as u64;
        }
        file.flush().await?;
    }
    Ok(())
}
