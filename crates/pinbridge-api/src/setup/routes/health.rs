//! Health check handler.

use axum::Json;
use pinbridge_core::models::HealthResponse;

/// Static liveness response.
///
/// Pinata credentials are checked once at startup, so a running server
/// reports the connection as established without re-checking it.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Server is running", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        pinata_connected: true,
    })
}
