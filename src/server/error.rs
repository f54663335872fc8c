//! HTTP error responses for the proxy surface.
//!
//! Upstream failures are translated into a status code plus a JSON body
//! `{ "error": <kind>, "message": <detail> }`. Upstream HTTP errors keep the
//! upstream's own status and carry its body as the message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::error::UpstreamError;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: Value,
}

/// Structured API error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, kind: &str, message: impl Into<Value>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: kind.to_string(),
                message: message.into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Timeout => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "upstream_timeout",
                "The API server did not respond in time. Check that it is reachable from this host.",
            ),
            UpstreamError::Network(detail) => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "upstream_unreachable",
                format!("Unable to reach the API server: {detail}"),
            ),
            UpstreamError::Http { status, body } => ApiError::new(
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                "upstream_error",
                body,
            ),
            UpstreamError::Unknown(detail) => {
                error!(error = %detail, "unexpected proxy failure");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "proxy_error", detail)
            }
        }
    }
}
