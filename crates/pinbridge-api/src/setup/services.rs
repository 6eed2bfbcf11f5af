//! Remote service clients

use anyhow::{Context, Result};
use pinbridge_core::Config;
use pinbridge_services::{PinataClient, PinningClient};
use std::sync::Arc;

/// Build the Pinata client and check its credentials.
///
/// Authentication failure is fatal.
pub async fn setup_pinning(config: &Config) -> Result<Arc<dyn PinningClient>> {
    let client = PinataClient::new(config.pinata())?;
    verify_pinning(&client).await?;

    tracing::info!(
        api_url = %config.pinata().api_url,
        gateway_url = %config.gateway_url(),
        "Successfully connected to Pinata"
    );
    Ok(Arc::new(client))
}

pub async fn verify_pinning(client: &dyn PinningClient) -> Result<()> {
    client
        .test_authentication()
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Pinata authentication failed"))
        .context("Pinata authentication failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinbridge_services::{MockPinningClient, PinningError};

    #[tokio::test]
    async fn test_verify_pinning_accepts_valid_credentials() {
        let client = MockPinningClient::new();
        verify_pinning(&client).await.unwrap();
        assert_eq!(client.auth_checks(), 1);
    }

    #[tokio::test]
    async fn test_verify_pinning_rejects_bad_credentials() {
        let client = MockPinningClient::new()
            .rejecting_credentials(PinningError::Authentication("401 Unauthorized".into()));
        let err = verify_pinning(&client).await.unwrap_err();
        assert!(err.to_string().contains("Pinata authentication failed"));
    }
}
