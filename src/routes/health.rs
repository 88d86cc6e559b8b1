//! Health check endpoint
//!
//! /health, /healthz - liveness check. Returns 200 whenever the service is
//! running; `storeConnected` reports whether the backend has been reached.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use super::json_response;
use crate::server::AppState;

/// Liveness response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub healthy: bool,
    /// 'online' or 'degraded' (store not reachable yet)
    pub status: &'static str,
    pub version: &'static str,
    /// Persistence backend in use
    pub store: &'static str,
    pub store_connected: bool,
    pub node_id: String,
    /// Operating mode
    pub mode: &'static str,
    pub timestamp: String,
}

pub async fn health_check(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let store = state.pledges.store();
    let store_connected = store.is_ready().await;

    let body = HealthResponse {
        healthy: true,
        status: if store_connected { "online" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store: store.backend(),
        store_connected,
        node_id: state.args.node_id.to_string(),
        mode: if state.args.dev_mode {
            "development"
        } else {
            "production"
        },
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    json_response(StatusCode::OK, body)
}
