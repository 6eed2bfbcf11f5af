//! Multipart parsing for the upload endpoint

use crate::services::upload::ReceivedFile;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::BytesMut;
use pinbridge_core::constants::UPLOAD_FIELD_NAME;
use pinbridge_core::AppError;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Read exactly one file from the field named `file`.
///
/// The size limit is enforced chunk by chunk so an oversized upload is
/// rejected before it is fully buffered. Other fields are ignored, as is a
/// `file` field with no or an empty file name (what browsers send when
/// nothing was selected).
pub async fn extract_single_file(
    mut multipart: Multipart,
    max_size: usize,
) -> Result<ReceivedFile, AppError> {
    let mut received: Option<ReceivedFile> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }
        let Some(original_name) = field
            .file_name()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
        else {
            continue;
        };
        if received.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if data.len() + chunk.len() > max_size {
                return Err(AppError::PayloadTooLarge(format!(
                    "File exceeds maximum allowed size of {} bytes",
                    max_size
                )));
            }
            data.extend_from_slice(&chunk);
        }

        received = Some(ReceivedFile {
            original_name,
            content_type,
            data: data.freeze(),
        });
    }

    received.ok_or(AppError::MissingFile)
}
