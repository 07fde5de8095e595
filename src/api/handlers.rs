//! HTTP handlers for the OpenAI-compatible API.

use super::types::*;
use super::AppState;
use crate::catalog::{Route, RoutingTable};
use crate::error::GatewayError;
use crate::proxy::{self, Capability};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

// ============================================================================
// Health and models handlers
// ============================================================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let models = state.catalog.snapshot().map(|t| t.len()).unwrap_or(0);
    Json(HealthResponse {
        status: "ok",
        app: "freegate",
        version: env!("CARGO_PKG_VERSION"),
        models,
    })
}

pub async fn list_models(State(state): State<Arc<AppState>>) -> Response {
    state.catalog.ensure_populated().await;

    let Some(table) = state.catalog.snapshot() else {
        return GatewayError::CatalogUnavailable.into_response();
    };

    let created = chrono::Utc::now().timestamp();
    let mut data: Vec<ModelInfo> = table
        .iter()
        .map(|(id, route)| ModelInfo {
            id: id.clone(),
            object: "model",
            created,
            owned_by: route.provider_key.clone(),
        })
        .collect();
    data.sort_by(|a, b| a.id.cmp(&b.id));

    Json(ModelsResponse {
        object: "list",
        data,
    })
    .into_response()
}

// ============================================================================
// Routing helpers
// ============================================================================

/// Validate the bearer token against the configured shared secret. Missing
/// and wrong keys are indistinguishable to the caller.
pub fn check_auth(headers: &HeaderMap, api_key: &str) -> Result<(), GatewayError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(t) if t == api_key => Ok(()),
        _ => Err(GatewayError::Unauthorized),
    }
}

/// Resolve a namespaced model id to its route. Exact match only, and the
/// route must carry an upstream path for the requested capability.
pub fn resolve_route<'a>(
    table: &'a RoutingTable,
    model: &str,
    capability: Capability,
) -> Result<&'a Route, GatewayError> {
    let route = table
        .get(model)
        .ok_or_else(|| GatewayError::ModelNotFound(model.to_string()))?;

    if capability.path(route).is_none() {
        return Err(match capability {
            Capability::Image => GatewayError::ImageNotSupported(model.to_string()),
            Capability::Chat => GatewayError::ModelNotFound(model.to_string()),
        });
    }

    Ok(route)
}

/// Copy of the inbound body with `model` rewritten to the upstream's own id.
/// Every other field passes through unchanged.
pub fn rewrite_model(body: &Value, target_model_id: &str) -> Value {
    let mut rewritten = body.clone();
    if let Some(obj) = rewritten.as_object_mut() {
        obj.insert(
            "model".to_string(),
            Value::String(target_model_id.to_string()),
        );
    }
    rewritten
}

fn parse_json_body(bytes: &Bytes) -> Result<Value, GatewayError> {
    serde_json::from_slice(bytes)
        .map_err(|e| GatewayError::MalformedRequest(format!("invalid JSON body: {}", e)))
}

fn required_str_field<'a>(body: &'a Value, field: &str) -> Result<&'a str, GatewayError> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| GatewayError::MalformedRequest(format!("missing \"{}\" field", field)))
}

// ============================================================================
// Proxied capability handlers
// ============================================================================

pub async fn chat_completions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(e) = check_auth(&headers, &state.config.auth.api_key) {
        return e.into_response();
    }

    let request = match parse_json_body(&body) {
        Ok(v) => v,
        Err(e) => return e.into_response(),
    };
    let model = match required_str_field(&request, "model") {
        Ok(m) => m.to_string(),
        Err(e) => return e.into_response(),
    };

    state.catalog.ensure_populated().await;
    let Some(table) = state.catalog.snapshot() else {
        // A build may still be in flight; the caller retries once it lands.
        return GatewayError::ModelNotFound(model).into_response();
    };

    let route = match resolve_route(&table, &model, Capability::Chat) {
        Ok(r) => r,
        Err(e) => return e.into_response(),
    };

    let upstream_body = rewrite_model(&request, &route.target_model_id);
    proxy::forward(&state.proxy_client, route, &upstream_body, Capability::Chat).await
}

pub async fn images_generations(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(e) = check_auth(&headers, &state.config.auth.api_key) {
        return e.into_response();
    }

    let request = match parse_json_body(&body) {
        Ok(v) => v,
        Err(e) => return e.into_response(),
    };
    let model = match required_str_field(&request, "model") {
        Ok(m) => m.to_string(),
        Err(e) => return e.into_response(),
    };
    let prompt = match required_str_field(&request, "prompt") {
        Ok(p) => p.to_string(),
        Err(e) => return e.into_response(),
    };

    state.catalog.ensure_populated().await;
    let Some(table) = state.catalog.snapshot() else {
        return GatewayError::ModelNotFound(model).into_response();
    };

    let route = match resolve_route(&table, &model, Capability::Image) {
        Ok(r) => r,
        Err(e) => return e.into_response(),
    };

    // Image upstreams only accept the two fields; everything else is dropped.
    let upstream_body = serde_json::json!({
        "model": route.target_model_id,
        "prompt": prompt,
    });
    proxy::forward(&state.proxy_client, route, &upstream_body, Capability::Image).await
}
