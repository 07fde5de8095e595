//! OpenAI-compatible API surface.
//!
//! Endpoints:
//! - GET /health - Health check with current catalog size
//! - GET /v1/models - List discovered models (namespaced ids)
//! - POST /v1/chat/completions - Proxied chat completions
//! - POST /v1/images/generations - Proxied image generation

mod handlers;
mod types;

use axum::{
    routing::{get, post},
    Router,
};
use reqwest::Client;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::catalog::CatalogService;
use crate::config::Config;
use crate::registry::{self, ProviderConfig};

// Re-export commonly used helpers
pub use handlers::{check_auth, resolve_route, rewrite_model};
pub use types::*;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub config: Arc<Config>,
    pub proxy_client: Client,
}

impl AppState {
    pub fn new(config: Config, providers: Vec<ProviderConfig>) -> Self {
        let catalog_client = crate::http::catalog_client(config.upstream.catalog_timeout());
        Self {
            catalog: Arc::new(CatalogService::new(providers, catalog_client)),
            config: Arc::new(config),
            proxy_client: crate::http::proxy_client(),
        }
    }

    /// State backed by the built-in provider registry.
    pub fn with_builtin_providers(config: Config) -> Self {
        Self::new(config, registry::builtin())
    }
}

/// Create the API router with custom state.
pub fn create_router_with_state(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/v1/models", get(handlers::list_models))
        .route("/v1/chat/completions", post(handlers::chat_completions))
        .route("/v1/images/generations", post(handlers::images_generations))
        .with_state(Arc::new(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
