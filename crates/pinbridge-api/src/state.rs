//! Application state shared by all handlers.

use crate::auth::{CredentialStore, TokenIssuer};
use crate::services::upload::{UploadWorkflow, WorkflowConfig};
use pinbridge_core::Config;
use pinbridge_services::PinningClient;
use pinbridge_storage::StagingArea;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub workflow: UploadWorkflow,
    pub staging: Arc<dyn StagingArea>,
    pub credentials: Arc<CredentialStore>,
    pub tokens: TokenIssuer,
}

impl AppState {
    /// Wire the services together. The pinning client is read-only from here on.
    pub fn new(
        config: Config,
        staging: Arc<dyn StagingArea>,
        pinning: Arc<dyn PinningClient>,
    ) -> Self {
        let workflow = UploadWorkflow::new(
            staging.clone(),
            pinning,
            WorkflowConfig::from_config(&config),
        );
        let tokens = TokenIssuer::new(config.jwt_secret(), config.jwt_expiry_hours());

        Self {
            config,
            workflow,
            staging,
            credentials: Arc::new(CredentialStore::new()),
            tokens,
        }
    }
}
