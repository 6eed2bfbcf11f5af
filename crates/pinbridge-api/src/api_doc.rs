//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::setup::routes::health;
use pinbridge_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PinBridge API",
        version = "0.1.0",
        description = "Accepts one uploaded file, pins it to IPFS through Pinata and returns the content identifier with a gateway URL."
    ),
    paths(
        health::health_check,
        handlers::files::list_files,
        handlers::upload::upload_file,
        handlers::auth::register,
        handlers::auth::login,
    ),
    components(
        schemas(
            models::UploadResponse,
            models::HealthResponse,
            models::FileListResponse,
            models::RegisterRequest,
            models::LoginRequest,
            models::MessageResponse,
            models::TokenResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "upload", description = "Upload and pin a file"),
        (name = "auth", description = "In-memory accounts (mounted when AUTH_ROUTES_ENABLED=true)")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_upload_routes() {
        let spec = get_openapi_spec();
        assert!(spec.paths.paths.contains_key("/upload"));
        assert!(spec.paths.paths.contains_key("/health"));
        assert!(spec.paths.paths.contains_key("/files"));
    }
}
