//! Telemetry initialization
//!
//! Structured logging through tracing-subscriber. Filtering follows `RUST_LOG`.

mod init_basic;

pub use init_basic::{init_telemetry, shutdown_telemetry, TelemetryFormat};
