//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use pinbridge_core::Config;

/// Re-run the configuration rules; errors here abort startup.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()
}

/// Log settings that are allowed but worth a warning.
pub fn log_config_warnings(config: &Config) {
    if config.auth().jwt_secret_is_fallback {
        tracing::warn!(
            "JWT_SECRET is not set - using an insecure built-in secret (rejected in production)"
        );
    }

    if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS_ORIGINS allows all origins");
    }

    if config.pin_max_retries() > 0 {
        tracing::info!(
            max_retries = config.pin_max_retries(),
            backoff_ms = config.pin_retry_backoff().as_millis() as u64,
            "Transient pinning failures will be retried"
        );
    }

    if config.is_production() && config.jwt_secret().len() < 32 {
        tracing::warn!(
            "JWT secret is shorter than 32 characters - consider using a longer, more secure secret"
        );
    }
}
