//! In-memory [`PinningClient`] for tests.

use super::{PinResponse, PinUpload, PinningClient, PinningError};
use async_trait::async_trait;
use bytes::Bytes;
use pinbridge_core::PinMetadata;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::io::AsyncReadExt;

/// A pin request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedPin {
    pub file_name: String,
    pub content_length: u64,
    pub data: Bytes,
    pub metadata: PinMetadata,
}

#[derive(Default)]
struct MockState {
    next_id: u64,
    calls: Vec<RecordedPin>,
    auth_checks: usize,
    queued_failures: VecDeque<PinningError>,
    permanent_failure: Option<PinningError>,
    auth_failure: Option<PinningError>,
}

/// Deterministic pinning client.
///
/// Identifiers are `Qm` followed by a zero padded hex counter, so the first
/// successful pin returns `Qm000...001`.
#[derive(Default)]
pub struct MockPinningClient {
    state: Mutex<MockState>,
    delay: Option<Duration>,
}

impl MockPinningClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pin attempt fails with `err`.
    pub fn failing(self, err: PinningError) -> Self {
        self.lock().permanent_failure = Some(err);
        self
    }

    /// The next pin attempt fails with `err`; queued failures are consumed in order.
    pub fn fail_next(self, err: PinningError) -> Self {
        self.lock().queued_failures.push_back(err);
        self
    }

    /// `test_authentication` fails with `err`.
    pub fn rejecting_credentials(self, err: PinningError) -> Self {
        self.lock().auth_failure = Some(err);
        self
    }

    /// Sleep before answering each pin attempt.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Identifier the mock assigns to its `n`th successful pin (1-based).
    pub fn ipfs_hash_for(n: u64) -> String {
        format!("Qm{:044x}", n)
    }

    pub fn calls(&self) -> Vec<RecordedPin> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn auth_checks(&self) -> usize {
        self.lock().auth_checks
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PinningClient for MockPinningClient {
    async fn test_authentication(&self) -> Result<(), PinningError> {
        let mut state = self.lock();
        state.auth_checks += 1;
        match &state.auth_failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn pin_file(
        &self,
        mut upload: PinUpload,
        metadata: &PinMetadata,
    ) -> Result<PinResponse, PinningError> {
        let mut data = Vec::with_capacity(upload.content_length as usize);
        upload
            .reader
            .read_to_end(&mut data)
            .await
            .map_err(|e| PinningError::Source(e.to_string()))?;

        self.lock().calls.push(RecordedPin {
            file_name: upload.file_name.clone(),
            content_length: upload.content_length,
            data: Bytes::from(data),
            metadata: metadata.clone(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.lock();
        if let Some(err) = state.queued_failures.pop_front() {
            return Err(err);
        }
        if let Some(err) = &state.permanent_failure {
            return Err(err.clone());
        }

        state.next_id += 1;
        Ok(PinResponse {
            ipfs_hash: Self::ipfs_hash_for(state.next_id),
            pin_size: Some(upload.content_length),
            timestamp: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn upload(data: &'static [u8]) -> PinUpload {
        PinUpload {
            reader: Box::pin(data),
            file_name: "a.png".to_string(),
            content_length: data.len() as u64,
        }
    }

    #[tokio::test]
    async fn records_calls_and_counts_identifiers() {
        let client = MockPinningClient::new();
        let metadata = PinMetadata::new("a.png", "image/png", Utc::now());

        let first = client.pin_file(upload(b"one"), &metadata).await.unwrap();
        let second = client.pin_file(upload(b"two"), &metadata).await.unwrap();

        assert_eq!(first.ipfs_hash, MockPinningClient::ipfs_hash_for(1));
        assert_eq!(second.ipfs_hash, MockPinningClient::ipfs_hash_for(2));
        assert_eq!(first.ipfs_hash.len(), 46);

        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].data.as_ref(), b"one");
        assert_eq!(calls[1].metadata.keyvalues.file_type, "image/png");
    }

    #[tokio::test]
    async fn queued_failures_are_consumed_before_success() {
        let client =
            MockPinningClient::new().fail_next(PinningError::Timeout(Duration::from_secs(1)));
        let metadata = PinMetadata::new("a.png", "image/png", Utc::now());

        assert!(client.pin_file(upload(b"x"), &metadata).await.is_err());
        assert!(client.pin_file(upload(b"x"), &metadata).await.is_ok());
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn authentication_failure_is_reported() {
        let client = MockPinningClient::new()
            .rejecting_credentials(PinningError::Authentication("401".into()));

        assert!(client.test_authentication().await.is_err());
        assert_eq!(client.auth_checks(), 1);
    }
}
