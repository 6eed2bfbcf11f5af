use bytes::Bytes;
use pinbridge_core::Config;
use std::fmt;
use std::time::Duration;

/// A file fully read from the request, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct ReceivedFile {
    pub original_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Workflow states, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Received,
    Staged,
    Submitting,
    Pinned,
    Failed,
    Cleaned,
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UploadState::Received => "received",
            UploadState::Staged => "staged",
            UploadState::Submitting => "submitting",
            UploadState::Pinned => "pinned",
            UploadState::Failed => "failed",
            UploadState::Cleaned => "cleaned",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Base of retrieval URLs, without trailing slash
    pub gateway_url: String,
    /// Deadline for a single pin attempt
    pub attempt_timeout: Duration,
    /// Extra attempts after a transient failure
    pub max_retries: u32,
    /// Delay before retry `n` is `n * retry_backoff`
    pub retry_backoff: Duration,
}

impl WorkflowConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            gateway_url: config.gateway_url().to_string(),
            attempt_timeout: config.pin_timeout(),
            max_retries: config.pin_max_retries(),
            retry_backoff: config.pin_retry_backoff(),
        }
    }
}
