//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>` and use `?` on
//! anything that converts into [`AppError`]; the rendering below gives every
//! failure the same `{ success: false, message, error? }` body.
//!
//! Diagnostics of sensitive errors are removed in production by
//! [`redact_sensitive_diagnostics`], which reads the environment from the
//! loaded `Config` rather than the process.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use pinbridge_core::{AppError, ErrorMetadata, LogLevel};
use pinbridge_services::PinningError;
use pinbridge_storage::StorageError;
use serde::de::DeserializeOwned;
use std::any::Any;

pub use pinbridge_infra::ErrorResponse;

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from pinbridge-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(AppError::Staging(err.to_string()))
    }
}

impl From<PinningError> for HttpAppError {
    fn from(err: PinningError) -> Self {
        HttpAppError(AppError::Pinning(err.to_string()))
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, error_code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, error_code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type,
                error_code,
                "Request failed"
            );
        }
    }
}

/// Left on the response of a sensitive error so its diagnostic can be removed.
#[derive(Debug, Clone)]
struct SensitiveDiagnostic {
    message: String,
}

/// Render an error with its status and full body.
pub fn error_response(error: &AppError) -> Response {
    let status =
        StatusCode::from_u16(error.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse::new(error.client_message(), error.diagnostic());

    let mut response = (status, Json(body)).into_response();
    if error.is_sensitive() {
        response.extensions_mut().insert(SensitiveDiagnostic {
            message: error.client_message(),
        });
    }
    response
}

/// Drop the `error` field of sensitive error responses when running in production.
pub async fn redact_sensitive_diagnostics(
    State(is_production): State<bool>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    if !is_production {
        return response;
    }

    match response.extensions_mut().remove::<SensitiveDiagnostic>() {
        Some(SensitiveDiagnostic { message }) => {
            (response.status(), Json(ErrorResponse::new(message, None))).into_response()
        }
        None => response,
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        log_error(&self.0);
        error_response(&self.0)
    }
}

/// Text of a caught panic payload.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}

/// Response for a panic caught by `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic_message(panic.as_ref());
    tracing::error!(panic = %detail, "Handler panicked");

    error_response(&AppError::Internal(detail))
}
