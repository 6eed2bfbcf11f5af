//! Staging area abstraction
//!
//! This module defines the StagingArea trait that the upload workflow depends on.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Staging operation errors
///
/// Messages refer to staged files by generated name only; absolute paths are
/// kept out so they can be returned to clients as diagnostics.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to stage file: {0}")]
    StageFailed(String),

    #[error("Failed to read staged file: {0}")]
    ReadFailed(String),

    #[error("Staged file not found: {0}")]
    NotFound(String),

    #[error("Failed to list staging area: {0}")]
    ListFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for staging operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Reader over the bytes of a staged file.
pub type StagedReader = Pin<Box<dyn AsyncRead + Send + Sync + Unpin>>;

/// A file that has been fully received and written to the staging area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Generated, unique file name inside the staging area
    pub name: String,
    /// Absolute location on disk
    pub path: PathBuf,
    /// Name the client uploaded the file under
    pub original_name: String,
    /// Declared media type
    pub content_type: String,
    /// Size in bytes
    pub size: u64,
}

/// Staging area abstraction
///
/// A staged file is read by the pinning step and then released exactly once,
/// whatever the outcome of the pin attempt.
#[async_trait]
pub trait StagingArea: Send + Sync {
    /// Write the received bytes under a freshly generated name.
    async fn stage(
        &self,
        original_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<StagedFile>;

    /// Open a staged file for reading.
    async fn open(&self, staged: &StagedFile) -> StorageResult<StagedReader>;

    /// Remove a staged file.
    ///
    /// Best effort and idempotent: a missing file counts as released and any
    /// other failure is logged, never returned.
    async fn release(&self, staged: &StagedFile);

    /// Names of the files currently present, sorted.
    async fn list(&self) -> StorageResult<Vec<String>>;

    /// Root directory of the staging area.
    fn root(&self) -> &Path;
}
