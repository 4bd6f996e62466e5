//! Cross-origin policy for the browser client.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

/// Allows the configured client origin to call the API.
///
/// Only `Authorization` and `Content-Type` request headers are allowed. An
/// origin that is not a valid header value disables cross-origin access.
pub fn layer(client_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match HeaderValue::from_str(client_url.trim_end_matches('/')) {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!(client_url, error = %e, "CLIENT_URL is not a valid origin, CORS disabled");
            cors
        }
    }
}
