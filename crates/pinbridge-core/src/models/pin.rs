use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Descriptive metadata attached to a pin request (`pinataMetadata`).
///
/// Not used for identity or lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinMetadata {
    pub name: String,
    pub keyvalues: PinKeyValues,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinKeyValues {
    /// RFC 3339 UTC timestamp with millisecond precision.
    #[serde(rename = "uploadDate")]
    pub upload_date: String,
    #[serde(rename = "fileType")]
    pub file_type: String,
}

impl PinMetadata {
    pub fn new(
        original_name: impl Into<String>,
        content_type: impl Into<String>,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: original_name.into(),
            keyvalues: PinKeyValues {
                upload_date: uploaded_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                file_type: content_type.into(),
            },
        }
    }
}

/// Outcome of a successful pin: the content identifier and where to fetch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinResult {
    pub ipfs_hash: String,
    pub url: String,
}

impl PinResult {
    /// Build the retrieval URL by joining the gateway base and the identifier.
    pub fn new(gateway_url: &str, ipfs_hash: impl Into<String>) -> Self {
        let ipfs_hash = ipfs_hash.into();
        let url = format!("{}/{}", gateway_url.trim_end_matches('/'), ipfs_hash);
        Self { ipfs_hash, url }
    }
}

/// `POST /upload` success body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    /// Content identifier returned by the pinning service
    pub ipfs_hash: String,
    /// Gateway URL that embeds the content identifier
    pub url: String,
}

impl From<PinResult> for UploadResponse {
    fn from(result: PinResult) -> Self {
        Self {
            success: true,
            ipfs_hash: result.ipfs_hash,
            url: result.url,
        }
    }
}

/// `GET /health` body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub pinata_connected: bool,
}

/// `GET /files` body: names currently present in the staging area.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileListResponse {
    pub success: bool,
    pub files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_pin_result_url_embeds_identifier() {
        let result = PinResult::new("https://gateway.pinata.cloud/ipfs/", "QmAbc");
        assert_eq!(result.url, "https://gateway.pinata.cloud/ipfs/QmAbc");
        assert_eq!(result.ipfs_hash, "QmAbc");
    }

    #[test]
    fn test_pin_metadata_wire_shape() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let metadata = PinMetadata::new("a.png", "image/png", at);
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["name"], "a.png");
        assert_eq!(json["keyvalues"]["uploadDate"], "2024-05-01T12:30:00.000Z");
        assert_eq!(json["keyvalues"]["fileType"], "image/png");
    }

    #[test]
    fn test_upload_response_uses_camel_case() {
        let response = UploadResponse::from(PinResult::new("https://gw/ipfs", "QmXyz"));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["ipfsHash"], "QmXyz");
        assert_eq!(json["url"], "https://gw/ipfs/QmXyz");
    }

    #[test]
    fn test_health_response_shape() {
        let json = serde_json::to_value(HealthResponse {
            status: "healthy".to_string(),
            pinata_connected: true,
        })
        .unwrap();
        assert_eq!(json["pinataConnected"], true);
    }
}
