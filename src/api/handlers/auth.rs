//! Handlers for registration, login and password reset.

use axum::{Json, extract::State};

use crate::api::dto::MessageResponse;
use crate::api::dto::auth::{
    ActivateRequest, ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest,
    ResetPasswordRequest,
};
use crate::api::extract::ValidatedJson;
use crate::error::AppError;
use crate::state::AppState;

/// Starts a registration by emailing an activation link.
///
/// # Endpoint
///
/// `POST /api/register`
///
/// # Request Body
///
/// ```json
/// { "name": "Ada", "email": "ada@example.com", "password": "secret1", "categories": [1, 2] }
/// ```
///
/// No account exists until the link is followed. A failed email send still
/// answers 200 with a different message.
///
/// # Errors
///
/// Returns 400 Bad Request on validation errors.
/// Returns 409 Conflict if the email is already registered.
pub async fn register_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = state.auth_service.register(payload.into()).await?;
    Ok(Json(message.into()))
}

/// Completes a registration from an activation token.
///
/// # Endpoint
///
/// `POST /api/register/activate`
///
/// # Errors
///
/// Returns 401 Unauthorized if the token is expired or invalid, or if the
/// email was taken in the meantime.
pub async fn activate_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ActivateRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = state.auth_service.activate(&payload.token).await?;
    Ok(Json(message.into()))
}

/// Exchanges credentials for a 7-day session token.
///
/// # Endpoint
///
/// `POST /api/login`
///
/// # Response
///
/// ```json
/// { "token": "eyJ...", "user": { "id": 1, "name": "Ada", "email": "ada@example.com", "role": "subscriber" } }
/// ```
pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let result = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        token: result.token,
        user: result.user,
    }))
}

/// `POST /api/forgot-password`
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = state.auth_service.forgot_password(&payload.email).await?;
    Ok(Json(message.into()))
}

/// `POST /api/reset-password`
///
/// The token can be used once; a second attempt answers 400.
pub async fn reset_password_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = state
        .auth_service
        .reset_password(&payload.reset_password_link, &payload.new_password)
        .await?;
    Ok(Json(message.into()))
}
