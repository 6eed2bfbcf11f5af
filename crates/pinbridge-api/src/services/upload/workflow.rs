use super::types::{ReceivedFile, UploadState, WorkflowConfig};
use crate::error::panic_message;
use chrono::Utc;
use futures::FutureExt;
use pinbridge_core::{AppError, PinMetadata, PinResult};
use pinbridge_services::{PinResponse, PinUpload, PinningClient, PinningError};
use pinbridge_storage::{StagedFile, StagingArea};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Stages an uploaded file, pins it and cleans up.
#[derive(Clone)]
pub struct UploadWorkflow {
    staging: Arc<dyn StagingArea>,
    pinning: Arc<dyn PinningClient>,
    config: WorkflowConfig,
}

impl UploadWorkflow {
    pub fn new(
        staging: Arc<dyn StagingArea>,
        pinning: Arc<dyn PinningClient>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            staging,
            pinning,
            config,
        }
    }

    /// Run the workflow on its own task.
    ///
    /// The spawned task is not cancelled when the caller's future is dropped,
    /// so a client disconnect cannot interrupt it between staging and cleanup.
    pub async fn run_detached(&self, file: ReceivedFile) -> Result<PinResult, AppError> {
        let workflow = self.clone();
        tokio::spawn(async move { workflow.run(file).await }.in_current_span())
            .await
            .map_err(|e| AppError::Internal(format!("Upload task failed: {}", e)))?
    }

    /// Run the workflow to completion on the current task.
    pub async fn run(&self, file: ReceivedFile) -> Result<PinResult, AppError> {
        let start = Instant::now();
        tracing::debug!(
            state = %UploadState::Received,
            original_name = %file.original_name,
            content_type = %file.content_type,
            size_bytes = file.data.len(),
            "Upload received"
        );

        let staged = self
            .staging
            .stage(&file.original_name, &file.content_type, file.data)
            .await
            .map_err(|e| AppError::Staging(e.to_string()))?;
        tracing::debug!(state = %UploadState::Staged, staged_name = %staged.name, "Upload staged");

        // A panicking client must not skip the release below.
        let outcome = AssertUnwindSafe(self.submit(&staged))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(AppError::Pinning(format!(
                    "Pinning client panicked: {}",
                    panic_message(panic.as_ref())
                )))
            });
        match &outcome {
            Ok(result) => tracing::info!(
                state = %UploadState::Pinned,
                staged_name = %staged.name,
                ipfs_hash = %result.ipfs_hash,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Upload pinned"
            ),
            Err(e) => tracing::warn!(
                state = %UploadState::Failed,
                staged_name = %staged.name,
                error = %e,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Upload failed"
            ),
        }

        self.staging.release(&staged).await;
        tracing::debug!(state = %UploadState::Cleaned, staged_name = %staged.name, "Upload cleaned");

        outcome
    }

    async fn submit(&self, staged: &StagedFile) -> Result<PinResult, AppError> {
        let metadata = PinMetadata::new(&staged.original_name, &staged.content_type, Utc::now());
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            tracing::debug!(
                state = %UploadState::Submitting,
                staged_name = %staged.name,
                attempt,
                "Submitting to pinning service"
            );

            match self.attempt(staged, &metadata).await {
                Ok(response) => {
                    return Ok(PinResult::new(&self.config.gateway_url, response.ipfs_hash));
                }
                Err(e) if e.is_transient() && attempt <= self.config.max_retries => {
                    let delay = self.config.retry_backoff * attempt;
                    tracing::warn!(
                        staged_name = %staged.name,
                        attempt,
                        error = %e,
                        retry_in_ms = delay.as_millis() as u64,
                        "Transient pinning failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(AppError::Pinning(e.to_string())),
            }
        }
    }

    /// One bounded attempt; reopens the staged file so retries send the full content.
    async fn attempt(
        &self,
        staged: &StagedFile,
        metadata: &PinMetadata,
    ) -> Result<PinResponse, PinningError> {
        let reader = self
            .staging
            .open(staged)
            .await
            .map_err(|e| PinningError::Source(e.to_string()))?;

        let upload = PinUpload {
            reader,
            file_name: staged.name.clone(),
            content_length: staged.size,
        };

        match tokio::time::timeout(
            self.config.attempt_timeout,
            self.pinning.pin_file(upload, metadata),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(PinningError::Timeout(self.config.attempt_timeout)),
        }
    }
}
