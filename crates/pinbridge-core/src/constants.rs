//! Shared constants.

/// Default Pinata REST endpoint.
pub const DEFAULT_PINATA_API_URL: &str = "https://api.pinata.cloud";

/// Default public gateway used to build retrieval URLs.
pub const DEFAULT_GATEWAY_URL: &str = "https://gateway.pinata.cloud/ipfs";

/// Multipart field that carries the uploaded file.
pub const UPLOAD_FIELD_NAME: &str = "file";

/// Allowance on top of the file size limit for multipart boundaries and headers.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Fallback token-signing secret used when `JWT_SECRET` is unset outside production.
pub const INSECURE_JWT_SECRET: &str = "supersecretkey";
