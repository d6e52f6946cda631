use crate::error::{CrawlError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Somewhere to put downloaded page bodies.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Writes `content` as `file_name` inside `dir`, creating `dir` if needed.
    /// Returns the path that was written.
    async fn write_blob(&self, dir: &Path, file_name: &str, content: &str) -> Result<PathBuf>;
}

/// Writes pages as plain files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Storage for FsStorage {
    async fn write_blob(&self, dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| CrawlError::Storage {
                path: dir.to_path_buf(),
                source,
            })?;

        let path = dir.join(file_name);
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| CrawlError::Storage {
                path: path.clone(),
                source,
            })?;

        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("out");

        let path = FsStorage::new()
            .write_blob(&dir, "page.html", "<p>hi</p>")
            .await
            .unwrap();

        assert_eq!(path, dir.join("page.html"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_overwrites_existing_file() {
        let tmp = TempDir::new().unwrap();
        let storage = FsStorage::new();

        storage.write_blob(tmp.path(), "same.html", "first").await.unwrap();
        let path = storage.write_blob(tmp.path(), "same.html", "second").await.unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_destination_is_a_file() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = FsStorage::new()
            .write_blob(&blocker, "page.html", "body")
            .await
            .unwrap_err();

        assert!(matches!(err, CrawlError::Storage { .. }));
    }
}
