//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`  - Health check: DB and notification queue (public)
//! - `/api/*`        - JSON API, see [`crate::api::routes`]
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Only the configured client origin
//! - **Body limit** - Caps request bodies, which carry base64 images
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// HTTP settings that shape the router but are not part of [`AppState`].
#[derive(Debug, Clone)]
pub struct RouterSettings {
    /// Origin allowed by CORS.
    pub client_url: String,
    pub body_limit_bytes: usize,
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState, settings: &RouterSettings) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, settings))
}

/// Routes and middleware without path normalization.
pub fn build_router(state: AppState, settings: &RouterSettings) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes(state.clone()))
        .with_state(state)
        .layer(DefaultBodyLimit::max(settings.body_limit_bytes))
        .layer(cors::layer(&settings.client_url))
        .layer(tracing::layer())
}
