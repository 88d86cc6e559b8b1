//! Pledge submission and pledge wall endpoints
//!
//! - POST /api/pledges - submit a pledge
//! - GET /api/pledges?limit=N - public pledge wall, newest first
//! - GET /api/pledges/count?profileType=L - count for one profile type

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{error_response, json_response};
use crate::server::AppState;
use crate::types::PledgeError;

/// Largest accepted submission body
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CountQuery {
    #[serde(rename = "profileType")]
    profile_type: Option<String>,
}

/// Parse the `limit` parameter.
///
/// Absent, non-numeric and negative values fall back to `default`. The
/// store applies the upper bound.
pub fn parse_limit(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n >= 0)
        .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
        .unwrap_or(default)
}

/// Submit a pledge
pub async fn handle_submit(state: Arc<AppState>, body: Bytes) -> Response<Full<Bytes>> {
    let dev_mode = state.args.dev_mode;

    if body.len() > MAX_BODY_BYTES {
        return error_response(
            &PledgeError::BadRequest(format!(
                "Request body exceeds {} bytes",
                MAX_BODY_BYTES
            )),
            dev_mode,
        );
    }

    // An empty body is an empty submission, reported as missing fields
    let raw: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Default::default())
    } else {
        match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(e) => return error_response(&PledgeError::from(e), dev_mode),
        }
    };

    match state.pledges.submit(&raw).await {
        Ok(id) => json_response(
            StatusCode::CREATED,
            serde_json::json!({ "ok": true, "id": id }),
        ),
        Err(e) => error_response(&e, dev_mode),
    }
}

/// List public pledge views
pub async fn handle_list(state: Arc<AppState>, query: Option<&str>) -> Response<Full<Bytes>> {
    let params: ListQuery = query
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();
    let limit = parse_limit(params.limit.as_deref(), state.args.list_default_limit);

    match state.pledges.list(limit).await {
        Ok(pledges) => json_response(
            StatusCode::OK,
            serde_json::json!({ "ok": true, "pledges": pledges }),
        ),
        Err(e) => error_response(&e, state.args.dev_mode),
    }
}

/// Count pledges for one profile type label
pub async fn handle_count(state: Arc<AppState>, query: Option<&str>) -> Response<Full<Bytes>> {
    let params: CountQuery = query
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();

    let Some(label) = params.profile_type.filter(|l| !l.trim().is_empty()) else {
        return error_response(
            &PledgeError::MissingFields(vec!["profileType".to_string()]),
            state.args.dev_mode,
        );
    };

    match state.pledges.aggregator().count_by_label(&label).await {
        Ok(count) => json_response(
            StatusCode::OK,
            serde_json::json!({ "ok": true, "profileType": label, "count": count }),
        ),
        Err(e) => error_response(&e, state.args.dev_mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None, 50), 50);
        assert_eq!(parse_limit(Some("10"), 50), 10);
        assert_eq!(parse_limit(Some(" 7 "), 50), 7);
        assert_eq!(parse_limit(Some("0"), 50), 0);
        assert_eq!(parse_limit(Some("-3"), 50), 50);
        assert_eq!(parse_limit(Some("abc"), 50), 50);
        assert_eq!(parse_limit(Some("100000"), 50), 100_000);
    }

    #[test]
    fn test_count_query_parsing() {
        let params: CountQuery =
            serde_urlencoded::from_str("profileType=Working+Professional").unwrap();
        assert_eq!(params.profile_type.as_deref(), Some("Working Professional"));
    }
}
