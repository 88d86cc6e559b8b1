//! HTTP routes for the pledge service

pub mod health;
pub mod pledges;
pub mod stats;

pub use health::health_check;
pub use pledges::{handle_count, handle_list, handle_submit};
pub use stats::handle_stats;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::{debug, error};

use crate::types::PledgeError;

/// Build a JSON response with permissive CORS
pub fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response<Full<Bytes>> {
    let body = serde_json::to_string(&body).unwrap_or_else(|_| "{}".to_string());
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// Map an error to its response. Server-side failures are logged in full
/// here since the caller may not see the detail.
pub fn error_response(err: &PledgeError, dev_mode: bool) -> Response<Full<Bytes>> {
    if err.is_user_correctable() {
        debug!(error = %err, "Request rejected");
    } else {
        error!(error = %err, "Request failed");
    }
    json_response(err.status_code(), err.to_body(dev_mode))
}
