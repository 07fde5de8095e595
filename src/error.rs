//! Unified error handling for Freegate.
//!
//! Every caller-facing failure is a structured JSON response; a connection
//! is never silently closed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

/// Unified error type for gateway operations.
#[derive(Debug, Clone)]
pub enum GatewayError {
    /// Missing or non-matching bearer token.
    Unauthorized,
    /// Invalid JSON body or a missing required field.
    MalformedRequest(String),
    /// Requested model id is not in the routing table.
    ModelNotFound(String),
    /// Model exists but its provider has no image endpoint.
    ImageNotSupported(String),
    /// No routing table has ever been published.
    CatalogUnavailable,
    /// Upstream could not be reached at the transport level.
    UpstreamUnreachable(String),
    /// Internal error.
    Internal(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "Invalid API key"),
            Self::MalformedRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::ModelNotFound(model) => write!(
                f,
                "Model '{}' not found. Model ids use the 'provider/model' form; see GET /v1/models",
                model
            ),
            Self::ImageNotSupported(model) => {
                write!(f, "Model '{}' does not support image generation", model)
            }
            Self::CatalogUnavailable => write!(f, "Model catalog is still loading"),
            Self::UpstreamUnreachable(msg) => write!(f, "Upstream unreachable: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Error response structure for JSON serialization.
#[derive(Serialize)]
struct ErrorResponseBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    message: String,
    r#type: String,
}

impl GatewayError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::ModelNotFound(_) => StatusCode::NOT_FOUND,
            Self::ImageNotSupported(_) => StatusCode::NOT_FOUND,
            Self::CatalogUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::MalformedRequest(_) => "invalid_request",
            Self::ModelNotFound(_) => "model_not_found",
            Self::ImageNotSupported(_) => "model_not_found",
            Self::CatalogUnavailable => "service_unavailable",
            Self::UpstreamUnreachable(_) => "upstream_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponseBody {
            error: ErrorDetail {
                message: self.to_string(),
                r#type: self.error_type().to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_has_correct_status() {
        let err = GatewayError::Unauthorized;
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.error_type(), "unauthorized");
    }

    #[test]
    fn model_not_found_mentions_namespaced_form() {
        let err = GatewayError::ModelNotFound("doesnotexist/x".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("doesnotexist/x"));
        assert!(err.to_string().contains("provider/model"));
    }

    #[test]
    fn malformed_request_has_correct_status() {
        let err = GatewayError::MalformedRequest("missing \"model\" field".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("model"));
    }

    #[test]
    fn image_not_supported_maps_to_not_found() {
        let err = GatewayError::ImageNotSupported("grok/grok-3".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_type(), "model_not_found");
    }

    #[test]
    fn catalog_unavailable_has_correct_status() {
        let err = GatewayError::CatalogUnavailable;
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn upstream_unreachable_has_correct_status() {
        let err = GatewayError::UpstreamUnreachable("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_type(), "upstream_error");
    }

    #[test]
    fn error_implements_display() {
        let err = GatewayError::CatalogUnavailable;
        assert_eq!(format!("{}", err), "Model catalog is still loading");
    }

    #[test]
    fn error_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<GatewayError>();
    }
}
