//! HTTP error response body
//!
//! The IntoResponse implementation for AppError lives in pinbridge-api
//! because of the orphan rule.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Client-facing summary
    pub message: String,
    /// Lower-level diagnostic, omitted when absent or hidden
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_missing_diagnostic() {
        let body = serde_json::to_value(ErrorResponse::new("No file provided", None)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "success": false, "message": "No file provided" })
        );
    }

    #[test]
    fn includes_diagnostic() {
        let body = serde_json::to_value(ErrorResponse::new(
            "File upload failed",
            Some("Pinning service returned 502: bad gateway".to_string()),
        ))
        .unwrap();
        assert_eq!(body["error"], "Pinning service returned 502: bad gateway");
    }
}
