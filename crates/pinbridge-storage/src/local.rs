use crate::keys::generate_staged_name;
use crate::traits::{StagedFile, StagedReader, StagingArea, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem staging area
#[derive(Debug, Clone)]
pub struct LocalStagingArea {
    root: PathBuf,
}

impl LocalStagingArea {
    /// Create a new LocalStagingArea, creating the directory if needed.
    ///
    /// Relative paths are resolved against the current working directory.
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()
                .map_err(|e| {
                    StorageError::ConfigError(format!("Failed to resolve working directory: {}", e))
                })?
                .join(root)
        };

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create staging directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(LocalStagingArea { root })
    }

    async fn write_new(path: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl StagingArea for LocalStagingArea {
    async fn stage(
        &self,
        original_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<StagedFile> {
        let name = generate_staged_name(original_name);
        let path = self.root.join(&name);
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        if let Err(e) = Self::write_new(&path, &data).await {
            // AlreadyExists means the file is not ours to remove
            if e.kind() != ErrorKind::AlreadyExists {
                let _ = fs::remove_file(&path).await;
            }
            tracing::error!(staged_name = %name, error = %e, "Failed to stage upload");
            return Err(StorageError::StageFailed(format!("{}: {}", name, e)));
        }

        tracing::info!(
            staged_name = %name,
            original_name = %original_name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Staged upload"
        );

        Ok(StagedFile {
            name,
            path,
            original_name: original_name.to_string(),
            content_type: content_type.to_string(),
            size,
        })
    }

    async fn open(&self, staged: &StagedFile) -> StorageResult<StagedReader> {
        match fs::File::open(&staged.path).await {
            Ok(file) => Ok(Box::pin(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(staged.name.clone()))
            }
            Err(e) => Err(StorageError::ReadFailed(format!("{}: {}", staged.name, e))),
        }
    }

    async fn release(&self, staged: &StagedFile) {
        match fs::remove_file(&staged.path).await {
            Ok(()) => {
                tracing::debug!(staged_name = %staged.name, "Released staged file");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(staged_name = %staged.name, "Staged file already released");
            }
            Err(e) => {
                tracing::warn!(
                    staged_name = %staged.name,
                    error = %e,
                    "Failed to release staged file"
                );
            }
        }
    }

    async fn list(&self) -> StorageResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| StorageError::ListFailed(e.to_string()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::ListFailed(e.to_string()))?
        {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_new_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("uploads");

        let staging = LocalStagingArea::new(&root).await.unwrap();

        assert!(root.is_dir());
        assert_eq!(staging.root(), root.as_path());
    }

    #[tokio::test]
    async fn test_stage_open_release() {
        let dir = tempdir().unwrap();
        let staging = LocalStagingArea::new(dir.path()).await.unwrap();

        let staged = staging
            .stage("a.png", "image/png", Bytes::from_static(b"0123456789"))
            .await
            .unwrap();

        assert_eq!(staged.size, 10);
        assert_eq!(staged.original_name, "a.png");
        assert_eq!(staged.content_type, "image/png");
        assert!(staged.name.ends_with("-a.png"));
        assert!(staged.path.starts_with(dir.path()));

        let mut reader = staging.open(&staged).await.unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"0123456789");
        drop(reader);

        staging.release(&staged).await;
        assert!(!staged.path.exists());
        assert!(staging.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let dir = tempdir().unwrap();
        let staging = LocalStagingArea::new(dir.path()).await.unwrap();

        let staged = staging
            .stage("doc.pdf", "application/pdf", Bytes::from_static(b"%PDF"))
            .await
            .unwrap();

        staging.release(&staged).await;
        staging.release(&staged).await;
        assert!(staging.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_identical_uploads_get_distinct_names() {
        let dir = tempdir().unwrap();
        let staging = LocalStagingArea::new(dir.path()).await.unwrap();

        let first = staging
            .stage("same.png", "image/png", Bytes::from_static(b"same"))
            .await
            .unwrap();
        let second = staging
            .stage("same.png", "image/png", Bytes::from_static(b"same"))
            .await
            .unwrap();

        assert_ne!(first.name, second.name);
        assert_eq!(staging.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_hostile_name_stays_inside_root() {
        let dir = tempdir().unwrap();
        let staging = LocalStagingArea::new(dir.path()).await.unwrap();

        let staged = staging
            .stage("../../etc/passwd", "text/plain", Bytes::from_static(b"x"))
            .await
            .unwrap();

        assert_eq!(staged.path.parent().unwrap(), dir.path());
        assert!(staged.name.ends_with("-passwd"));
    }

    #[tokio::test]
    async fn test_open_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let staging = LocalStagingArea::new(dir.path()).await.unwrap();

        let staged = staging
            .stage("a.png", "image/png", Bytes::from_static(b"x"))
            .await
            .unwrap();
        staging.release(&staged).await;

        match staging.open(&staged).await {
            Err(StorageError::NotFound(name)) => assert_eq!(name, staged.name),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected NotFound"),
        }
    }

    #[tokio::test]
    async fn test_stage_failure_does_not_leak_path() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("gone");
        let staging = LocalStagingArea::new(&root).await.unwrap();
        std::fs::remove_dir(&root).unwrap();

        let err = staging
            .stage("a.png", "image/png", Bytes::from_static(b"x"))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("Failed to stage file"));
        assert!(!message.contains(&root.display().to_string()));
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), b"b").unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        let staging = LocalStagingArea::new(dir.path()).await.unwrap();

        assert_eq!(staging.list().await.unwrap(), vec!["a.txt", "b.txt"]);
    }
}
