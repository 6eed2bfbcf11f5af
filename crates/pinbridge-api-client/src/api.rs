//! Domain methods for the PinBridge API client.

use crate::ApiClient;
use anyhow::{Context, Result};
use pinbridge_core::constants::UPLOAD_FIELD_NAME;
use pinbridge_core::models::{FileListResponse, HealthResponse, UploadResponse};
use std::path::Path;

/// File extensions the upload command accepts.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "pdf"];

/// Content type for an accepted extension, or `None` if the file is not accepted.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

impl ApiClient {
    pub async fn health(&self) -> Result<HealthResponse> {
        self.get("/health").await
    }

    /// Names currently in the server's staging area.
    pub async fn list_files(&self) -> Result<FileListResponse> {
        self.get("/files").await
    }

    /// Upload one local file to be pinned.
    pub async fn upload_file(&self, path: &Path) -> Result<UploadResponse> {
        let content_type = content_type_for(path).ok_or_else(|| {
            anyhow::anyhow!(
                "Unsupported file type: {} (allowed: {})",
                path.display(),
                ALLOWED_EXTENSIONS.join(", ")
            )
        })?;

        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(filename)
            .mime_str(content_type)
            .context("Invalid content type")?;
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD_NAME, part);

        self.post_multipart("/upload", form).await
    }
}
