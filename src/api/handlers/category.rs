//! Handlers for category management.

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde_json::json;

use crate::api::dto::MessageResponse;
use crate::api::dto::category::{
    CategoryPageResponse, CreateCategoryRequest, UpdateCategoryRequest,
};
use crate::api::dto::pagination::PageParams;
use crate::api::extract::ValidatedJson;
use crate::api::middleware::auth::AuthSubject;
use crate::domain::entities::Category;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a category with an uploaded image.
///
/// # Endpoint
///
/// `POST /api/category`
///
/// # Request Body
///
/// ```json
/// { "name": "Node JS", "image": "data:image/png;base64,iVBORw0...", "content": "..." }
/// ```
///
/// # Errors
///
/// - 400 if the image cannot be decoded or uploaded
/// - 409 if a category with the same slug exists
pub async fn create_category_handler(
    State(state): State<AppState>,
    Extension(AuthSubject(user_id)): Extension<AuthSubject>,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let category = state
        .category_service
        .create(&payload.name, &payload.image, &payload.content, user_id)
        .await?;

    Ok(Json(category))
}

/// `GET /api/categories`
pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.category_service.list().await?))
}

/// Reads a category and a page of its links.
///
/// # Endpoint
///
/// `GET /api/category/{slug}?limit=10&skip=0`
pub async fn read_category_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<CategoryPageResponse>, AppError> {
    let Query(params) = query?;
    read_page(&state, &slug, &params).await
}

/// Same as [`read_category_handler`] with paging taken from the body.
///
/// # Endpoint
///
/// `POST /api/category/{slug}` with an optional `{ "limit": 10, "skip": 0 }` body.
pub async fn read_category_page_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    body: Bytes,
) -> Result<Json<CategoryPageResponse>, AppError> {
    let params = if body.iter().all(u8::is_ascii_whitespace) {
        PageParams::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            AppError::bad_request("Invalid request body", json!({ "reason": e.to_string() }))
        })?
    };

    read_page(&state, &slug, &params).await
}

async fn read_page(
    state: &AppState,
    slug: &str,
    params: &PageParams,
) -> Result<Json<CategoryPageResponse>, AppError> {
    let (limit, skip) = params
        .validate_and_get_limit_skip()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let page = state.category_service.read(slug, limit, skip).await?;
    Ok(Json(page.into()))
}

/// Updates a category. The image is replaced only when one is sent.
///
/// # Endpoint
///
/// `PUT /api/category/{slug}`
pub async fn update_category_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let category = state
        .category_service
        .update(
            &slug,
            &payload.name,
            &payload.content,
            payload.image.as_deref(),
        )
        .await?;

    Ok(Json(category))
}

/// `DELETE /api/category/{slug}`
pub async fn delete_category_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = state.category_service.remove(&slug).await?;
    Ok(Json(message.into()))
}
