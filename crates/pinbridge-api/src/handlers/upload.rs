use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_single_file;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use pinbridge_core::models::UploadResponse;
use pinbridge_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/upload",
    tag = "upload",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Exactly one field named `file`"),
    responses(
        (status = 200, description = "File pinned", body = UploadResponse),
        (status = 400, description = "No file, several files, or malformed multipart", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Staging or pinning failed", body = ErrorResponse)
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    // A request that is not multipart at all carries no file
    let multipart = multipart.map_err(|_| AppError::MissingFile)?;

    let file = extract_single_file(multipart, state.config.max_file_size_bytes()).await?;
    let result = state.workflow.run_detached(file).await?;

    Ok(Json(UploadResponse::from(result)))
}
