//! Shared HTTP client for the PinBridge API.
//!
//! Provides a minimal client with generic GET/POST helpers and domain
//! methods (health, files, upload). The CLI uses this client directly.

pub mod api;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Default server address, matching the API's default port.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Error body returned by the API on failure.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the PinBridge API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Result<Self> {
        // Uploads wait for the remote pin, which the server bounds at 60s per attempt
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create client from environment: PINBRIDGE_API_URL (or API_URL).
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("PINBRIDGE_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.build_url(path))
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse(response).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.build_url(path))
            .multipart(form)
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse(response).await
    }

    /// Decode a success body, or turn the API error body into an error.
    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(match serde_json::from_str::<ApiErrorBody>(&error_text) {
                Ok(ApiErrorBody {
                    message,
                    error: Some(detail),
                }) => anyhow::anyhow!("{} ({}): {}", message, status, detail),
                Ok(ApiErrorBody { message, error: None }) => {
                    anyhow::anyhow!("{} ({})", message, status)
                }
                Err(_) => anyhow::anyhow!(
                    "API request failed with status {}: {}",
                    status,
                    error_text
                ),
            });
        }

        response
            .json()
            .await
            .context("Failed to parse response as JSON")
    }

    /// Raw client for custom requests.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

pub use api::{content_type_for, ALLOWED_EXTENSIONS};
pub use pinbridge_core::models::{FileListResponse, HealthResponse, UploadResponse};
