use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use pinbridge_core::models::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid email or password too short", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    state.credentials.register(request).await?;

    Ok(Json(MessageResponse {
        message: "User registered successfully!".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed token", body = TokenResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, HttpAppError> {
    let user = state
        .credentials
        .verify(&request.email, &request.password)
        .await?;
    let token = state.tokens.issue(&user)?;

    tracing::info!(email = %user.email, "User logged in");
    Ok(Json(TokenResponse { token }))
}
