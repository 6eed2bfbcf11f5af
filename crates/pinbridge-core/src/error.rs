//! Error types module
//!
//! All per-request failures are unified under [`AppError`]. Each variant
//! self-describes how it is presented to clients through [`ErrorMetadata`],
//! so the HTTP layer only has to render what the error reports.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "PINNING_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Lower-level diagnostic text safe to show to the client, if any
    fn diagnostic(&self) -> Option<String>;

    /// Whether the diagnostic should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No file provided")]
    MissingFile,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Staging error: {0}")]
    Staging(String),

    #[error("Pinning error: {0}")]
    Pinning(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::MissingFile => (400, "NO_FILE", false, LogLevel::Debug),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Debug),
        AppError::Staging(_) => (500, "STAGING_ERROR", true, LogLevel::Error),
        AppError::Pinning(_) => (500, "PINNING_ERROR", true, LogLevel::Error),
        AppError::InvalidCredentials => {
            (400, "INVALID_CREDENTIALS", false, LogLevel::Debug)
        }
        AppError::Conflict(_) => (409, "CONFLICT", false, LogLevel::Debug),
        AppError::Unauthorized(_) => (401, "UNAUTHORIZED", false, LogLevel::Debug),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for logs
    pub fn error_type(&self) -> &str {
        match self {
            AppError::MissingFile => "MissingFile",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Staging(_) => "Staging",
            AppError::Pinning(_) => "Pinning",
            AppError::InvalidCredentials => "InvalidCredentials",
            AppError::Conflict(_) => "Conflict",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::MissingFile => "No file provided".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(_) => "File too large".to_string(),
            AppError::Staging(_) | AppError::Pinning(_) => "File upload failed".to_string(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::Conflict(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    fn diagnostic(&self) -> Option<String> {
        match self {
            AppError::PayloadTooLarge(ref msg)
            | AppError::Staging(ref msg)
            | AppError::Pinning(ref msg)
            | AppError::Internal(ref msg) => Some(msg.clone()),
            AppError::InternalWithSource { ref message, .. } => Some(message.clone()),
            AppError::MissingFile
            | AppError::InvalidInput(_)
            | AppError::InvalidCredentials
            | AppError::Conflict(_)
            | AppError::Unauthorized(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_missing_file() {
        let err = AppError::MissingFile;
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "NO_FILE");
        assert_eq!(err.client_message(), "No file provided");
        assert!(err.diagnostic().is_none());
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_pinning() {
        let err = AppError::Pinning("remote returned 502".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "PINNING_ERROR");
        assert_eq!(err.client_message(), "File upload failed");
        assert_eq!(err.diagnostic().as_deref(), Some("remote returned 502"));
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_staging_uses_upload_failure_message() {
        let err = AppError::Staging("disk full".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "File upload failed");
    }

    #[test]
    fn test_error_metadata_payload_too_large() {
        let err = AppError::PayloadTooLarge("10485761 bytes exceeds max 10485760 bytes".into());
        assert_eq!(err.http_status_code(), 413);
        assert_eq!(err.client_message(), "File too large");
        assert!(err.diagnostic().unwrap().contains("10485760"));
    }

    #[test]
    fn test_error_metadata_invalid_credentials() {
        let err = AppError::InvalidCredentials;
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.client_message(), "Invalid credentials");
    }

    #[test]
    fn test_internal_hides_message_from_client() {
        let err = AppError::Internal("join error at /srv/app".to_string());
        assert_eq!(err.client_message(), "Internal server error");
        assert!(err.is_sensitive());
    }

    #[test]
    fn test_from_anyhow_keeps_chain() {
        let source = anyhow::anyhow!("root cause").context("outer context");
        let err = AppError::from(source);
        assert_eq!(err.http_status_code(), 500);
        assert!(err.detailed_message().contains("root cause"));
    }
}
