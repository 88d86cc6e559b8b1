//! Campaign KPI endpoint
//!
//! GET /api/stats - totals, per-profile counts and progress to target

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use std::sync::Arc;

use super::{error_response, json_response};
use crate::server::AppState;

pub async fn handle_stats(state: Arc<AppState>) -> Response<Full<Bytes>> {
    match state.pledges.aggregator().summary().await {
        Ok(stats) => {
            let mut body = serde_json::to_value(&stats).unwrap_or_default();
            if let Some(obj) = body.as_object_mut() {
                obj.insert("ok".to_string(), serde_json::Value::Bool(true));
            }
            json_response(StatusCode::OK, body)
        }
        Err(e) => error_response(&e, state.args.dev_mode),
    }
}
