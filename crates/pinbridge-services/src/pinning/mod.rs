//! Pinning service abstraction.
//!
//! A pinning service durably stores a file and hands back a content
//! identifier. The upload workflow talks to it only through [`PinningClient`].

use async_trait::async_trait;
use pinbridge_core::PinMetadata;
use pinbridge_storage::StagedReader;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod pinata;

/// Longest remote error body kept in [`PinningError::Rejected`].
pub const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Clone, Error)]
pub enum PinningError {
    #[error("Pinning service rejected the credentials: {0}")]
    Authentication(String),

    #[error("Pinning service returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to reach pinning service: {0}")]
    Transport(String),

    /// Carries the deadline that was exceeded.
    #[error("Pinning request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Unexpected response from pinning service: {0}")]
    InvalidResponse(String),

    #[error("Failed to read staged file: {0}")]
    Source(String),
}

impl PinningError {
    /// Whether another attempt with the same input may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            PinningError::Transport(_) | PinningError::Timeout(_) => true,
            PinningError::Rejected { status, .. } => *status == 429 || *status >= 500,
            PinningError::Authentication(_)
            | PinningError::InvalidResponse(_)
            | PinningError::Source(_) => false,
        }
    }

    pub(crate) fn rejected(status: u16, body: &str) -> Self {
        PinningError::Rejected {
            status,
            body: truncate_chars(body, MAX_ERROR_BODY_CHARS),
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// A staged file handed to the pinning service.
pub struct PinUpload {
    pub reader: StagedReader,
    pub file_name: String,
    pub content_length: u64,
}

impl std::fmt::Debug for PinUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinUpload")
            .field("file_name", &self.file_name)
            .field("content_length", &self.content_length)
            .finish()
    }
}

/// Body of a successful `pinFileToIPFS` call.
///
/// Only `IpfsHash` is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PinResponse {
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
    #[serde(rename = "PinSize", default)]
    pub pin_size: Option<u64>,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<String>,
}

#[async_trait]
pub trait PinningClient: Send + Sync {
    /// Check that the configured credentials are accepted.
    async fn test_authentication(&self) -> Result<(), PinningError>;

    /// Submit one file with its descriptive metadata.
    async fn pin_file(
        &self,
        upload: PinUpload,
        metadata: &PinMetadata,
    ) -> Result<PinResponse, PinningError>;
}
