//! Upstream proxy execution.
//!
//! Issues the rewritten request and relays status, a minimal header set, and
//! the body as a live byte stream. The body is never buffered on the success
//! path; streamed chat tokens and binary image payloads pass through as-is.

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use reqwest::Client;
use serde_json::Value;

use crate::catalog::Route;
use crate::error::GatewayError;

/// Which proxied capability a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Chat,
    Image,
}

impl Capability {
    /// The route's upstream path for this capability, if the provider has one.
    pub fn path<'a>(&self, route: &'a Route) -> Option<&'a str> {
        match self {
            Self::Chat => route.chat_path.as_deref(),
            Self::Image => route.image_path.as_deref(),
        }
    }

    /// Content type assumed when the upstream does not declare one.
    fn default_content_type(&self) -> &'static str {
        match self {
            Self::Chat => "text/event-stream",
            Self::Image => "image/png",
        }
    }
}

/// POST the rewritten body upstream and relay the response.
///
/// Transport failures become 502; a non-success upstream status is surfaced
/// with its body read in full and passed through verbatim, since the caller
/// has no other way to diagnose the upstream.
pub async fn forward(
    client: &Client,
    route: &Route,
    body: &Value,
    capability: Capability,
) -> Response {
    let Some(path) = capability.path(route) else {
        return GatewayError::Internal(format!(
            "route for '{}/{}' has no upstream path for this capability",
            route.provider_key, route.target_model_id
        ))
        .into_response();
    };

    let url = format!("{}{}", route.origin(), path);
    tracing::debug!(%url, model = %route.target_model_id, "forwarding upstream");

    let upstream = match client.post(&url).json(body).send().await {
        Ok(response) => response,
        Err(e) => return GatewayError::UpstreamUnreachable(e.to_string()).into_response(),
    };

    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_else(|| capability.default_content_type())
        .to_string();

    if !status.is_success() {
        tracing::warn!(%url, status = status.as_u16(), "upstream returned error status");
        let error_body = upstream.bytes().await.unwrap_or_default();
        return Response::builder()
            .status(StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY))
            .header("Content-Type", content_type)
            .body(Body::from(error_body))
            .unwrap()
            .into_response();
    }

    let stream = upstream
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));

    Response::builder()
        .status(StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::OK))
        .header("Content-Type", content_type)
        .header("Cache-Control", "no-cache")
        .body(Body::from_stream(stream))
        .unwrap()
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_with_paths(chat: Option<&str>, image: Option<&str>) -> Route {
        Route {
            provider_key: "p".to_string(),
            upstream_host: "example.com".to_string(),
            chat_path: chat.map(str::to_string),
            image_path: image.map(str::to_string),
            target_model_id: "m1".to_string(),
        }
    }

    #[test]
    fn capability_resolves_matching_path() {
        let route = route_with_paths(Some("/chat"), Some("/images"));
        assert_eq!(Capability::Chat.path(&route), Some("/chat"));
        assert_eq!(Capability::Image.path(&route), Some("/images"));
    }

    #[test]
    fn capability_path_is_none_when_unconfigured() {
        let route = route_with_paths(Some("/chat"), None);
        assert_eq!(Capability::Image.path(&route), None);
    }

    #[test]
    fn default_content_types_per_capability() {
        assert_eq!(Capability::Chat.default_content_type(), "text/event-stream");
        assert_eq!(Capability::Image.default_content_type(), "image/png");
    }
}
