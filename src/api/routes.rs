//! API route configuration.
//!
//! Routes are grouped by the guard they need. Groups sharing a path (for
//! example `GET` and `PUT /category/{slug}`) are merged method by method.

use crate::api::handlers::{
    activate_handler, click_count_handler, create_category_handler, create_link_handler,
    delete_category_handler, delete_link_handler, forgot_password_handler,
    list_categories_handler, list_links_handler, list_links_page_handler, login_handler,
    popular_in_category_handler, popular_links_handler, read_category_handler,
    read_category_page_handler, read_link_handler, read_user_handler, register_handler,
    reset_password_handler, update_category_handler, update_link_handler, update_user_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

/// All API routes, to be nested under `/api`.
///
/// # Endpoints
///
/// Public:
/// - `POST /register`, `POST /register/activate`, `POST /login`
/// - `POST /forgot-password`, `POST /reset-password`
/// - `GET  /categories`, `GET|POST /category/{slug}`
/// - `GET  /link/{id}`, `GET /link/popular`, `GET /link/popular/{slug}`
/// - `POST /click-count`
///
/// Signed in:
/// - `GET|PUT /user`
/// - `POST /category`, `PUT|DELETE /category/{slug}`
/// - `POST /link`
///
/// Signed in and owner of the link:
/// - `PUT|DELETE /link/{id}`
///
/// Admin:
/// - `GET /admin`, `GET|POST /links`, `PUT|DELETE /link/admin/{id}`
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(signed_in_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .merge(owner_routes(state.clone()))
        .merge(admin_routes(state))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/register/activate", post(activate_handler))
        .route("/login", post(login_handler))
        .route("/forgot-password", post(forgot_password_handler))
        .route("/reset-password", post(reset_password_handler))
        .route("/categories", get(list_categories_handler))
        .route(
            "/category/{slug}",
            get(read_category_handler).post(read_category_page_handler),
        )
        .route("/link/popular", get(popular_links_handler))
        .route("/link/popular/{slug}", get(popular_in_category_handler))
        .route("/link/{id}", get(read_link_handler))
        .route("/click-count", post(click_count_handler))
}

/// Routes that only need a valid session.
fn signed_in_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/category", post(create_category_handler))
        .route(
            "/category/{slug}",
            put(update_category_handler).delete(delete_category_handler),
        )
        .route("/link", post(create_link_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::require_signin))
}

/// Routes that work on the loaded account.
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/user", get(read_user_handler).put(update_user_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::load_user))
        .route_layer(middleware::from_fn_with_state(state, auth::require_signin))
}

fn owner_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/link/{id}",
            put(update_link_handler).delete(delete_link_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_link_owner,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::load_user))
        .route_layer(middleware::from_fn_with_state(state, auth::require_signin))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin", get(read_user_handler))
        .route(
            "/links",
            get(list_links_handler).post(list_links_page_handler),
        )
        .route(
            "/link/admin/{id}",
            put(update_link_handler).delete(delete_link_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ))
        .route_layer(middleware::from_fn_with_state(state, auth::require_signin))
}
