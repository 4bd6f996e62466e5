//! Handlers for the signed-in user's profile.

use axum::{Extension, Json, extract::State};

use crate::api::dto::user::{UpdateUserRequest, UserProfileResponse};
use crate::api::extract::ValidatedJson;
use crate::api::middleware::auth::CurrentUser;
use crate::domain::entities::PublicUser;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the profile and every link the user posted.
///
/// # Endpoint
///
/// - `GET /api/user`
/// - `GET /api/admin` (admins only, same payload)
///
/// # Response
///
/// ```json
/// {
///   "user": { "id": 1, "username": "k3x9a2b7", "name": "Ada", "email": "ada@example.com",
///             "role": "subscriber", "categories": [1, 2], "created_at": "..." },
///   "links": []
/// }
/// ```
pub async fn read_user_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<UserProfileResponse>, AppError> {
    let profile = state.user_service.profile(&user).await?;
    Ok(Json(profile.into()))
}

/// Updates name, password or followed categories.
///
/// # Endpoint
///
/// `PUT /api/user`
///
/// # Errors
///
/// Returns 400 if the password is shorter than 6 characters; nothing is
/// changed in that case.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<PublicUser>, AppError> {
    let updated = state.user_service.update(user.id, payload.into()).await?;
    Ok(Json(updated))
}
