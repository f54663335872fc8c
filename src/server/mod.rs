//! HTTP surface of the caching proxy.
//!
//! Routes:
//! - `GET /api/{*path}` — cache-aside read of the upstream path
//! - `DELETE /api/cache` — drop every cached record
//! - `GET /health` — liveness plus cache statistics
//!
//! The [`CacheProxy`] is built by the caller and injected through
//! [`AppState`].

#[cfg(feature = "server")]
pub mod config;
pub mod error;
pub mod types;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::proxy::CacheProxy;
use error::ApiError;
use types::{ClearResponse, HealthResponse};

/// Prefix under which upstream paths are exposed.
pub const API_PREFIX: &str = "/api/";

/// Response header reporting `HIT` or `MISS`.
pub const CACHE_HEADER: &str = "x-cache";

#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<CacheProxy>,
}

impl AppState {
    pub fn new(proxy: CacheProxy) -> Self {
        Self {
            proxy: Arc::new(proxy),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health))
        .route(
            "/api/cache",
            axum::routing::get(proxy_get).delete(clear_cache),
        )
        .route("/api/{*path}", axum::routing::get(proxy_get))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Upstream path for a request URI: everything after `/api/`, query included.
pub fn upstream_path(uri: &Uri) -> String {
    let path = uri.path().strip_prefix(API_PREFIX).unwrap_or(uri.path());
    match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    }
}

/// Wrap a bare payload as `{status: "ok", data}`; pass an existing envelope through.
pub fn envelope(body: Value) -> Value {
    match &body {
        Value::Object(map) if map.contains_key("status") && map.contains_key("data") => body,
        _ => json!({ "status": "ok", "data": body }),
    }
}

async fn proxy_get(State(state): State<AppState>, uri: Uri) -> Result<Response, ApiError> {
    let path = upstream_path(&uri);
    let response = state.proxy.get(&path).await?;
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
    Ok((
        status,
        [(CACHE_HEADER, response.source.as_str())],
        Json(envelope(response.body)),
    )
        .into_response())
}

async fn clear_cache(State(state): State<AppState>) -> Json<ClearResponse> {
    Json(state.proxy.clear_cache().await.into())
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(state.proxy.health().await.into())
}
