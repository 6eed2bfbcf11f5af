//! Configuration module
//!
//! Configuration is read once at startup from the process environment (after
//! loading an optional `.env` file). Missing Pinata credentials are a hard
//! error: the server must not start without them.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_GATEWAY_URL, DEFAULT_PINATA_API_URL, INSECURE_JWT_SECRET, MULTIPART_OVERHEAD_BYTES,
};

const DEFAULT_PORT: u16 = 5000;
const MAX_FILE_SIZE_MB: usize = 10;
const JWT_EXPIRY_HOURS: i64 = 1;
const PIN_TIMEOUT_SECS: u64 = 60;
const PIN_MAX_RETRIES: u32 = 0;
const PIN_MAX_RETRIES_CAP: u32 = 3;
const PIN_RETRY_BACKOFF_MS: u64 = 500;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const STAGING_DIR: &str = "uploads";

/// Environment variables that must be present and non-empty.
pub const REQUIRED_ENV_VARS: [&str; 2] = ["PINATA_API_KEY", "PINATA_SECRET_API_KEY"];

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
    /// `compact` (default) or `json`
    pub log_format: String,
}

/// Pinata credentials and remote call policy
#[derive(Clone)]
pub struct PinataConfig {
    pub api_key: String,
    pub secret_api_key: String,
    pub api_url: String,
    pub gateway_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Debug for PinataConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PinataConfig")
            .field("api_key", &"[redacted]")
            .field("secret_api_key", &"[redacted]")
            .field("api_url", &self.api_url)
            .field("gateway_url", &self.gateway_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish()
    }
}

/// Staging area location and upload limits
#[derive(Clone, Debug)]
pub struct StagingConfig {
    pub dir: PathBuf,
    pub max_file_size_bytes: usize,
}

/// Settings for the standalone credential store
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// True when `JWT_SECRET` was not provided and the built-in fallback is in use.
    pub jwt_secret_is_fallback: bool,
    pub jwt_expiry_hours: i64,
    pub routes_enabled: bool,
}

impl Debug for AuthConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[redacted]")
            .field("jwt_secret_is_fallback", &self.jwt_secret_is_fallback)
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .field("routes_enabled", &self.routes_enabled)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct PinBridgeConfig {
    pub base: BaseConfig,
    pub pinata: PinataConfig,
    pub staging: StagingConfig,
    pub auth: AuthConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<PinBridgeConfig>);

impl Config {
    fn inner(&self) -> &PinBridgeConfig {
        &self.0
    }

    /// Load `.env` (if present) and read configuration from the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(get: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = PinBridgeConfig::from_vars(&get)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().base.http_concurrency_limit
    }

    pub fn log_format(&self) -> &str {
        &self.inner().base.log_format
    }

    pub fn pinata(&self) -> &PinataConfig {
        &self.inner().pinata
    }

    pub fn gateway_url(&self) -> &str {
        &self.inner().pinata.gateway_url
    }

    pub fn pin_timeout(&self) -> Duration {
        Duration::from_secs(self.inner().pinata.timeout_secs)
    }

    pub fn pin_max_retries(&self) -> u32 {
        self.inner().pinata.max_retries
    }

    pub fn pin_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.inner().pinata.retry_backoff_ms)
    }

    pub fn staging_dir(&self) -> &std::path::Path {
        &self.inner().staging.dir
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().staging.max_file_size_bytes
    }

    /// Whole-request cap for `/upload`: the file limit plus multipart framing.
    pub fn upload_body_limit(&self) -> Option<usize> {
        self.inner().upload_body_limit()
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.inner().auth
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().auth.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.inner().auth.jwt_expiry_hours
    }

    pub fn auth_routes_enabled(&self) -> bool {
        self.inner().auth.routes_enabled
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

/// Read a variable, treating empty strings as unset.
fn non_empty<F>(get: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a variable, falling back to `default` when unset or unparsable.
fn parse_or<F, T>(get: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    non_empty(get, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_bool<F>(get: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(get, key)
        .map(|v| v.to_lowercase())
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl PinBridgeConfig {
    fn upload_body_limit(&self) -> Option<usize> {
        self.staging
            .max_file_size_bytes
            .checked_add(MULTIPART_OVERHEAD_BYTES)
    }

    fn from_vars<F>(get: &F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing: Vec<&str> = REQUIRED_ENV_VARS
            .iter()
            .copied()
            .filter(|key| non_empty(get, key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(anyhow::anyhow!(
                "Missing required environment variables: {}",
                missing.join(", ")
            ));
        }

        let environment = non_empty(get, "ENVIRONMENT")
            .or_else(|| non_empty(get, "APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = match non_empty(get, "PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let cors_origins = non_empty(get, "CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port,
            cors_origins,
            environment,
            http_concurrency_limit: parse_or(get, "HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT)
                .max(1),
            log_format: non_empty(get, "LOG_FORMAT")
                .map(|v| v.to_lowercase())
                .unwrap_or_else(|| "compact".to_string()),
        };

        let pinata = PinataConfig {
            api_key: non_empty(get, "PINATA_API_KEY").unwrap_or_default(),
            secret_api_key: non_empty(get, "PINATA_SECRET_API_KEY").unwrap_or_default(),
            api_url: non_empty(get, "PINATA_API_URL")
                .unwrap_or_else(|| DEFAULT_PINATA_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            gateway_url: non_empty(get, "PINATA_GATEWAY_URL")
                .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs: parse_or(get, "PIN_TIMEOUT_SECS", PIN_TIMEOUT_SECS),
            max_retries: parse_or(get, "PIN_MAX_RETRIES", PIN_MAX_RETRIES).min(PIN_MAX_RETRIES_CAP),
            retry_backoff_ms: parse_or(get, "PIN_RETRY_BACKOFF_MS", PIN_RETRY_BACKOFF_MS),
        };

        let max_file_size_bytes = parse_or(get, "MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB)
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"))?;

        let staging = StagingConfig {
            dir: PathBuf::from(
                non_empty(get, "STAGING_DIR").unwrap_or_else(|| STAGING_DIR.to_string()),
            ),
            max_file_size_bytes,
        };

        let jwt_secret = non_empty(get, "JWT_SECRET");
        let auth = AuthConfig {
            jwt_secret_is_fallback: jwt_secret.is_none(),
            jwt_secret: jwt_secret.unwrap_or_else(|| INSECURE_JWT_SECRET.to_string()),
            jwt_expiry_hours: parse_or(get, "JWT_EXPIRY_HOURS", JWT_EXPIRY_HOURS),
            routes_enabled: parse_bool(get, "AUTH_ROUTES_ENABLED", false),
        };

        let config = PinBridgeConfig {
            base,
            pinata,
            staging,
            auth,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let is_production = is_production_name(&self.base.environment);

        if is_production && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if is_production && self.auth.jwt_secret_is_fallback {
            return Err(anyhow::anyhow!("JWT_SECRET must be set in production"));
        }

        if self.staging.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.upload_body_limit().is_none() {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"));
        }

        if !matches!(self.base.log_format.as_str(), "compact" | "json") {
            return Err(anyhow::anyhow!("LOG_FORMAT must be 'compact' or 'json'"));
        }

        if self.pinata.timeout_secs == 0 {
            return Err(anyhow::anyhow!("PIN_TIMEOUT_SECS must be greater than 0"));
        }

        if self.auth.jwt_expiry_hours <= 0 {
            return Err(anyhow::anyhow!("JWT_EXPIRY_HOURS must be greater than 0"));
        }

        for (name, url) in [
            ("PINATA_API_URL", &self.pinata.api_url),
            ("PINATA_GATEWAY_URL", &self.pinata.gateway_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!("{} must be an http(s) URL", name));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const CREDS: [(&str, &str); 2] = [
        ("PINATA_API_KEY", "key"),
        ("PINATA_SECRET_API_KEY", "secret"),
    ];

    #[test]
    fn test_missing_credentials_is_an_error() {
        let err = Config::from_vars(lookup(&[])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("PINATA_API_KEY"));
        assert!(msg.contains("PINATA_SECRET_API_KEY"));
    }

    #[test]
    fn test_empty_secret_counts_as_missing() {
        let err = Config::from_vars(lookup(&[
            ("PINATA_API_KEY", "key"),
            ("PINATA_SECRET_API_KEY", "  "),
        ]))
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("PINATA_SECRET_API_KEY"));
        assert!(!msg.contains("PINATA_API_KEY,"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(lookup(&CREDS)).unwrap();
        assert_eq!(config.server_port(), 5000);
        assert_eq!(config.max_file_size_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.gateway_url(), DEFAULT_GATEWAY_URL);
        assert_eq!(config.pinata().api_url, DEFAULT_PINATA_API_URL);
        assert_eq!(config.staging_dir(), std::path::Path::new("uploads"));
        assert_eq!(config.pin_max_retries(), 0);
        assert_eq!(config.pin_timeout(), Duration::from_secs(60));
        assert_eq!(config.cors_origins(), &["*".to_string()]);
        assert!(config.auth().jwt_secret_is_fallback);
        assert_eq!(config.jwt_secret(), INSECURE_JWT_SECRET);
        assert_eq!(config.jwt_expiry_hours(), 1);
        assert!(!config.auth_routes_enabled());
        assert!(!config.is_production());
        assert_eq!(config.log_format(), "compact");
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let mut vars = CREDS.to_vec();
        vars.push(("PORT", "not-a-port"));
        assert!(Config::from_vars(lookup(&vars)).is_err());
    }

    #[test]
    fn test_retries_are_capped() {
        let mut vars = CREDS.to_vec();
        vars.push(("PIN_MAX_RETRIES", "50"));
        let config = Config::from_vars(lookup(&vars)).unwrap();
        assert_eq!(config.pin_max_retries(), PIN_MAX_RETRIES_CAP);
    }

    #[test]
    fn test_oversized_file_limit_is_an_error() {
        let huge = (usize::MAX / 1024).to_string();
        let mut vars = CREDS.to_vec();
        vars.push(("MAX_FILE_SIZE_MB", huge.as_str()));
        let err = Config::from_vars(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("MAX_FILE_SIZE_MB"));

        let config = Config::from_vars(lookup(&CREDS)).unwrap();
        assert_eq!(
            config.upload_body_limit(),
            Some(10 * 1024 * 1024 + MULTIPART_OVERHEAD_BYTES)
        );
    }

    #[test]
    fn test_gateway_trailing_slash_trimmed() {
        let mut vars = CREDS.to_vec();
        vars.push(("PINATA_GATEWAY_URL", "https://example.mypinata.cloud/ipfs/"));
        let config = Config::from_vars(lookup(&vars)).unwrap();
        assert_eq!(config.gateway_url(), "https://example.mypinata.cloud/ipfs");
    }

    #[test]
    fn test_production_requires_jwt_secret_and_explicit_cors() {
        let mut vars = CREDS.to_vec();
        vars.push(("ENVIRONMENT", "production"));
        vars.push(("CORS_ORIGINS", "https://app.example.com"));
        let err = Config::from_vars(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));

        vars.push(("JWT_SECRET", "a-real-secret-from-the-vault"));
        let config = Config::from_vars(lookup(&vars)).unwrap();
        assert!(config.is_production());

        let mut wildcard = CREDS.to_vec();
        wildcard.push(("ENVIRONMENT", "prod"));
        wildcard.push(("JWT_SECRET", "a-real-secret-from-the-vault"));
        let err = Config::from_vars(lookup(&wildcard)).unwrap_err();
        assert!(err.to_string().contains("CORS_ORIGINS"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::from_vars(lookup(&CREDS)).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret\""));
        assert!(rendered.contains("[redacted]"));
    }
}
