//! Staging area setup

use anyhow::{Context, Result};
use pinbridge_core::Config;
use pinbridge_storage::{LocalStagingArea, StagingArea};
use std::sync::Arc;

pub async fn setup_staging(config: &Config) -> Result<Arc<dyn StagingArea>> {
    let staging = LocalStagingArea::new(config.staging_dir())
        .await
        .context("Failed to create staging area")?;

    tracing::info!(
        staging_dir = %staging.root().display(),
        max_file_size_bytes = config.max_file_size_bytes(),
        "Staging area ready"
    );

    Ok(Arc::new(staging))
}
