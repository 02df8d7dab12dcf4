//! Router assembly.

use crate::handlers;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use formgate_core::Config;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    // Multipart framing overhead on top of the largest accepted upload.
    let body_limit = state.config.upload_max_size_bytes * 2 + 1024 * 1024;
    let cors = build_cors(&state.config);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/forms/csrf-token", get(handlers::csrf_token))
        .route("/api/forms/contact", post(handlers::submit_contact))
        .route("/api/forms/career", post(handlers::submit_career))
        .route("/api/forms/partner", post(handlers::submit_partner))
        .route("/api/forms/newsletter", post(handlers::submit_newsletter))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors(config: &Config) -> CorsLayer {
    if config.cors_origins.is_empty() {
        // Same-origin deployment; nothing credentialed crosses origins.
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}
