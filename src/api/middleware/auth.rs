//! Session authentication and authorization middleware.
//!
//! The layers build on each other through request extensions:
//!
//! 1. [`require_signin`] verifies the bearer token and attaches [`AuthSubject`]
//! 2. [`load_user`] or [`require_admin`] load the account into [`CurrentUser`]
//! 3. [`require_link_owner`] compares the subject with the owner of `/link/{id}`
//!
//! Axum runs route layers in reverse order of registration, so
//! `require_signin` has to be added last.

use axum::{
    extract::{FromRequestParts, Path, Request, State, rejection::PathRejection},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::domain::entities::User;
use crate::{error::AppError, state::AppState};

/// Id of the user a verified session token was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSubject(pub i64);

/// The signed-in user, loaded from the database.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Verifies `Authorization: Bearer <token>` and attaches [`AuthSubject`].
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing or the token has a
/// bad signature or has expired. The response carries
/// `WWW-Authenticate: Bearer` per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/user", get(read_user_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::load_user))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_signin));
/// ```
pub async fn require_signin(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let mut req = Request::from_parts(parts, body);

    let user_id = st.auth_service.verify_session(&token)?;
    req.extensions_mut().insert(AuthSubject(user_id));

    Ok(next.run(req).await)
}

/// Loads the account behind [`AuthSubject`] into [`CurrentUser`].
///
/// # Errors
///
/// Returns `400 Bad Request` ("User not found") if the account is gone.
pub async fn load_user(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let AuthSubject(user_id) = subject(&req)?;

    let user = st.auth_service.load_user(user_id).await?;
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Like [`load_user`], but only lets admins through.
///
/// # Errors
///
/// Returns `400 Bad Request` ("Admin resource. Access denied") for
/// non-admin accounts.
pub async fn require_admin(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let AuthSubject(user_id) = subject(&req)?;

    let user = st.auth_service.load_admin(user_id).await?;
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Only lets the user who posted `/link/{id}` through.
///
/// # Errors
///
/// Returns `400 Bad Request` ("Could not find link") for an unknown id and
/// ("You are not authorized") when the link belongs to someone else.
pub async fn require_link_owner(
    State(st): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let AuthSubject(user_id) = subject(&req)?;
    let Path(link_id) = path?;

    st.link_service.ensure_owner(link_id, user_id).await?;

    Ok(next.run(req).await)
}

fn subject(req: &Request) -> Result<AuthSubject, AppError> {
    req.extensions()
        .get::<AuthSubject>()
        .copied()
        .ok_or_else(|| AppError::unauthorized("Unauthorized", json!({})))
}
