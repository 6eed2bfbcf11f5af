//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p pinbridge-api`.
//! The pinning service is replaced by [`MockPinningClient`] and staging uses
//! a temporary directory, so no network access or credentials are needed.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use pinbridge_api::setup::build_app;
use pinbridge_api::AppState;
use pinbridge_core::Config;
use pinbridge_services::MockPinningClient;
use pinbridge_storage::{LocalStagingArea, StagingArea};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_GATEWAY_URL: &str = "https://gateway.test/ipfs";

/// Test application: server plus the doubles behind it.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub pinning: Arc<MockPinningClient>,
    pub staging: Arc<LocalStagingArea>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Names currently present in the staging directory.
    pub async fn staged_files(&self) -> Vec<String> {
        self.staging
            .list()
            .await
            .expect("Failed to list staging directory")
    }
}

/// Configuration with fake credentials and any overrides applied.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("PINATA_API_KEY", "test-key"),
        ("PINATA_SECRET_API_KEY", "test-secret"),
        ("PINATA_GATEWAY_URL", TEST_GATEWAY_URL),
        ("JWT_SECRET", "integration-test-secret-that-is-long-enough"),
        ("PIN_TIMEOUT_SECS", "5"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }

    Config::from_vars(|key| vars.get(key).cloned()).expect("Failed to build test config")
}

/// Setup test app with a working mock pinning service.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(MockPinningClient::new(), &[]).await
}

/// Setup test app with a specific pinning double and config overrides.
pub async fn setup_test_app_with(
    pinning: MockPinningClient,
    overrides: &[(&str, &str)],
) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let staging = Arc::new(
        LocalStagingArea::new(temp_dir.path())
            .await
            .expect("Failed to create staging area"),
    );
    let pinning = Arc::new(pinning);

    let config = test_config(overrides);
    let (state, router) =
        build_app(config, staging.clone(), pinning.clone()).expect("Failed to build app");

    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        state,
        pinning,
        staging,
        _temp_dir: temp_dir,
    }
}
