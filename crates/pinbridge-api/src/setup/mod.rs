//! Application setup and initialization
//!
//! Startup order: validate configuration, initialize telemetry, create the
//! staging area, verify Pinata credentials, then build the router. Any
//! failure aborts startup before the listener is bound.

pub mod routes;
pub mod server;
pub mod services;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use pinbridge_core::Config;
use pinbridge_infra::TelemetryFormat;
use pinbridge_services::PinningClient;
use pinbridge_storage::StagingArea;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    let format: TelemetryFormat = config
        .log_format()
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    pinbridge_infra::init_telemetry("pinbridge-api", format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    validation::log_config_warnings(&config);
    tracing::info!(environment = %config.environment(), "Configuration loaded and validated");

    let staging = storage::setup_staging(&config).await?;
    let pinning = services::setup_pinning(&config).await?;

    build_app(config, staging, pinning)
}

/// Build state and router from already constructed dependencies.
pub fn build_app(
    config: Config,
    staging: Arc<dyn StagingArea>,
    pinning: Arc<dyn PinningClient>,
) -> Result<(Arc<AppState>, axum::Router)> {
    let state = Arc::new(AppState::new(config.clone(), staging, pinning));
    let router = routes::setup_routes(&config, state.clone())?;
    Ok((state, router))
}
