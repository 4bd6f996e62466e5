//! Handlers for links, click counting and popularity.

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use serde_json::json;

use crate::api::dto::MessageResponse;
use crate::api::dto::link::{ClickCountRequest, LinkRequest};
use crate::api::dto::pagination::PageParams;
use crate::api::extract::ValidatedJson;
use crate::api::middleware::auth::AuthSubject;
use crate::domain::entities::{ClickCount, Link};
use crate::error::AppError;
use crate::state::AppState;

/// Publishes a link and queues subscriber notifications.
///
/// # Endpoint
///
/// `POST /api/link`
///
/// # Request Body
///
/// ```json
/// {
///   "title": "The Rust Book",
///   "url": "https://doc.rust-lang.org/book/",
///   "categories": [1, 3],
///   "type": "free",
///   "medium": "book"
/// }
/// ```
///
/// The response does not wait for the notification emails.
///
/// # Errors
///
/// - 400 on validation errors or an unknown category
/// - 409 if the URL is already published
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(AuthSubject(user_id)): Extension<AuthSubject>,
    ValidatedJson(payload): ValidatedJson<LinkRequest>,
) -> Result<Json<Link>, AppError> {
    let link = state.link_service.create(payload.into(), user_id).await?;
    Ok(Json(link))
}

/// Lists links newest first.
///
/// # Endpoint
///
/// `GET /api/links?limit=10&skip=0` (admin only)
pub async fn list_links_handler(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Vec<Link>>, AppError> {
    let Query(params) = query?;
    list_page(&state, &params).await
}

/// `POST /api/links` with an optional `{ "limit": 10, "skip": 0 }` body (admin only).
pub async fn list_links_page_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<Link>>, AppError> {
    let params = if body.iter().all(u8::is_ascii_whitespace) {
        PageParams::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            AppError::bad_request("Invalid request body", json!({ "reason": e.to_string() }))
        })?
    };

    list_page(&state, &params).await
}

async fn list_page(state: &AppState, params: &PageParams) -> Result<Json<Vec<Link>>, AppError> {
    let (limit, skip) = params
        .validate_and_get_limit_skip()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    Ok(Json(state.link_service.list(limit, skip).await?))
}

/// `GET /api/link/{id}`
pub async fn read_link_handler(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Link>, AppError> {
    let Path(id) = path?;
    Ok(Json(state.link_service.read(id).await?))
}

/// Replaces a link's fields.
///
/// # Endpoint
///
/// - `PUT /api/link/{id}` (owner only)
/// - `PUT /api/link/admin/{id}` (admin only)
///
/// # Errors
///
/// - 404 if the link was removed in the meantime
/// - 409 if the new URL is already published
pub async fn update_link_handler(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    ValidatedJson(payload): ValidatedJson<LinkRequest>,
) -> Result<Json<Link>, AppError> {
    let Path(id) = path?;
    let link = state.link_service.update(id, payload.into()).await?;
    Ok(Json(link))
}

/// Removes a link and its click counter.
///
/// # Endpoint
///
/// - `DELETE /api/link/{id}` (owner only)
/// - `DELETE /api/link/admin/{id}` (admin only)
pub async fn delete_link_handler(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = path?;
    let message = state.link_service.remove(id).await?;
    Ok(Json(message.into()))
}

/// Counts one click.
///
/// # Endpoint
///
/// `POST /api/click-count` with `{ "link_id": 42 }`
///
/// # Response
///
/// ```json
/// { "link_id": 42, "clicks": 7 }
/// ```
pub async fn click_count_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ClickCountRequest>,
) -> Result<Json<ClickCount>, AppError> {
    Ok(Json(state.link_service.click_count(payload.link_id).await?))
}

/// `GET /api/link/popular`
pub async fn popular_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Link>>, AppError> {
    Ok(Json(state.link_service.popular().await?))
}

/// `GET /api/link/popular/{slug}`
pub async fn popular_in_category_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Link>>, AppError> {
    Ok(Json(state.link_service.popular_in_category(&slug).await?))
}
