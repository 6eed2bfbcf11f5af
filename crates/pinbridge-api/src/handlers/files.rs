use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use pinbridge_core::models::FileListResponse;
use pinbridge_core::AppError;
use std::sync::Arc;

/// List the staging directory.
///
/// Staged files are released after every upload, so this is normally empty.
#[utoipa::path(
    get,
    path = "/files",
    tag = "upload",
    responses(
        (status = 200, description = "Names currently in the staging area", body = FileListResponse),
        (status = 500, description = "Staging area could not be read", body = ErrorResponse)
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FileListResponse>, HttpAppError> {
    let files = state
        .staging
        .list()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(FileListResponse {
        success: true,
        files,
    }))
}
