//! PinBridge Core Library
//!
//! This crate provides the domain models, error types and configuration shared
//! by the staging, pinning and HTTP crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{AuthConfig, BaseConfig, Config, PinBridgeConfig, PinataConfig, StagingConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{PinMetadata, PinResult};
