//! Pinata REST client.

use super::{PinResponse, PinUpload, PinningClient, PinningError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use pinbridge_core::{PinMetadata, PinataConfig};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::{Duration, Instant};
use tokio_util::io::ReaderStream;

const API_KEY_HEADER: &str = "pinata_api_key";
const SECRET_KEY_HEADER: &str = "pinata_secret_api_key";

/// The only deadline this client enforces itself.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the Pinata pinning API
#[derive(Clone)]
pub struct PinataClient {
    http_client: Client,
    api_url: String,
    api_key: String,
    secret_api_key: String,
}

impl Debug for PinataClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PinataClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl PinataClient {
    /// Build a client from configuration.
    ///
    /// Only the connection phase is bounded here; whole-request deadlines are
    /// applied per attempt by the caller.
    pub fn new(config: &PinataConfig) -> Result<Self> {
        let http_client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client for Pinata")?;

        Ok(Self {
            http_client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            secret_api_key: config.secret_api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn error_body(response: Response) -> String {
        response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string())
    }
}

fn transport_error(err: reqwest::Error) -> PinningError {
    if err.is_timeout() {
        PinningError::Timeout(CONNECT_TIMEOUT)
    } else {
        PinningError::Transport(err.to_string())
    }
}

#[async_trait]
impl PinningClient for PinataClient {
    async fn test_authentication(&self) -> Result<(), PinningError> {
        let response = self
            .http_client
            .get(self.endpoint("/data/testAuthentication"))
            .header(API_KEY_HEADER, &self.api_key)
            .header(SECRET_KEY_HEADER, &self.secret_api_key)
            .send()
            .await
            .map_err(|e| PinningError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(PinningError::Authentication(format!(
                "{} - {}",
                status,
                body.chars().take(super::MAX_ERROR_BODY_CHARS).collect::<String>()
            )));
        }

        tracing::debug!(api_url = %self.api_url, "Pinata credentials accepted");
        Ok(())
    }

    async fn pin_file(
        &self,
        upload: PinUpload,
        metadata: &PinMetadata,
    ) -> Result<PinResponse, PinningError> {
        let start = Instant::now();
        let metadata_json = serde_json::to_string(metadata)
            .map_err(|e| PinningError::Source(format!("Failed to encode metadata: {}", e)))?;

        let body = reqwest::Body::wrap_stream(ReaderStream::new(upload.reader));
        let file_part =
            Part::stream_with_length(body, upload.content_length).file_name(upload.file_name.clone());
        let form = Form::new()
            .part("file", file_part)
            .text("pinataMetadata", metadata_json);

        let response = self
            .http_client
            .post(self.endpoint("/pinning/pinFileToIPFS"))
            .header(API_KEY_HEADER, &self.api_key)
            .header(SECRET_KEY_HEADER, &self.secret_api_key)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            tracing::warn!(
                status = status.as_u16(),
                file_name = %upload.file_name,
                "Pinata rejected pin request"
            );
            return Err(PinningError::rejected(status.as_u16(), &body));
        }

        let text = response
            .text()
            .await
            .map_err(transport_error)?;
        let pinned: PinResponse = serde_json::from_str(&text)
            .map_err(|e| PinningError::InvalidResponse(e.to_string()))?;
        if pinned.ipfs_hash.trim().is_empty() {
            return Err(PinningError::InvalidResponse(
                "response did not contain an IpfsHash".to_string(),
            ));
        }

        tracing::info!(
            ipfs_hash = %pinned.ipfs_hash,
            file_name = %upload.file_name,
            size_bytes = upload.content_length,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Pinata pin successful"
        );

        Ok(pinned)
    }
}
