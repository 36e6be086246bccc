//! HTTP surface of the alt-text relay.
//!
//! The router is built from an [`AppState`] so tests can serve it on an
//! ephemeral port with a stub or mock-backed model.

use std::sync::Arc;

use alttext_core::AltTextService;
use alttext_core::ServiceConfig;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::routing::post;

pub mod http;
pub mod middleware;

/// Room for the text fields and multipart framing on top of the image limit.
const FORM_OVERHEAD_BYTES: usize = 256 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub service: AltTextService,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        let service = AltTextService::from_config(&config);
        Self::with_service(config, service)
    }

    pub fn with_service(config: ServiceConfig, service: AltTextService) -> Self {
        Self {
            config: Arc::new(config),
            service,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        .route("/", get(http::handlers::root_handler))
        .route("/healthz", get(http::handlers::healthz_handler))
        .route(
            "/generate-alt-text",
            post(http::handlers::generate_alt_text_handler),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn_with_state(state.clone(), middleware::cors::cors_middleware))
        .layer(from_fn(middleware::request_tracing::request_tracing_middleware))
        .with_state(state)
}
