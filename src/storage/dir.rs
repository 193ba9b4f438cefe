use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::File;

/// Directory holding the source files to archive, named `<index>.txt`.
#[derive(Clone, Debug)]
pub struct SourceDir(PathBuf);

impl SourceDir {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn file_path(&self, index: usize) -> PathBuf {
        self.0.join(format!("{}.txt", index))
    }

    pub async fn open(&self, index: usize) -> io::Result<File> {
        File::open(self.file_path(index)).await
    }
}

#[cfg(test)]
mod tests {
    use super::SourceDir;

    #[test]
    fn file_path() {
        let dir = SourceDir::new("sources");
        assert_eq!(dir.file_path(0).to_str().unwrap(), "sources/0.txt");
        assert_eq!(dir.file_path(12).to_str().unwrap(), "sources/12.txt");
    }

    #[tokio::test]
    async fn open_missing() {
        let dir = SourceDir::new("/nonexistent");
        assert!(dir.open(0).await.is_err());
    }
}
