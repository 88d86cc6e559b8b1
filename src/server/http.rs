//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling. Request bodies are
//! collected before dispatch so [`dispatch`] can be driven without a socket.

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Args;
use crate::routes;
use crate::service::PledgeService;
use crate::types::PledgeError;

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub pledges: PledgeService,
}

impl AppState {
    pub fn new(args: Args, pledges: PledgeService) -> Self {
        Self { args, pledges }
    }
}

/// Resolved endpoint for a method and path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Preflight,
    Health,
    SubmitPledge,
    ListPledges,
    CountPledges,
    Stats,
    /// Known path, unsupported verb; carries the `Allow` header value
    MethodNotAllowed(&'static str),
    NotFound,
}

/// Map a request line to a route
pub fn resolve(method: &Method, path: &str) -> Route {
    if *method == Method::OPTIONS {
        return Route::Preflight;
    }

    match path {
        "/health" | "/healthz" => match *method {
            Method::GET => Route::Health,
            _ => Route::MethodNotAllowed("GET, OPTIONS"),
        },
        "/api/pledges" | "/pledges" => match *method {
            Method::GET => Route::ListPledges,
            Method::POST => Route::SubmitPledge,
            _ => Route::MethodNotAllowed("GET, POST, OPTIONS"),
        },
        // Serverless function paths used by the original campaign site
        "/.netlify/functions/add-pledge" => match *method {
            Method::POST => Route::SubmitPledge,
            _ => Route::MethodNotAllowed("POST, OPTIONS"),
        },
        "/.netlify/functions/get-pledges" => match *method {
            Method::GET => Route::ListPledges,
            _ => Route::MethodNotAllowed("GET, OPTIONS"),
        },
        "/api/pledges/count" => match *method {
            Method::GET => Route::CountPledges,
            _ => Route::MethodNotAllowed("GET, OPTIONS"),
        },
        "/api/stats" => match *method {
            Method::GET => Route::Stats,
            _ => Route::MethodNotAllowed("GET, OPTIONS"),
        },
        _ => Route::NotFound,
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<(), PledgeError> {
    let listener = TcpListener::bind(state.args.listen).await.map_err(|e| {
        PledgeError::Config(format!("Failed to bind {}: {}", state.args.listen, e))
    })?;

    info!(
        "Pledge service listening on {} as node {} (store: {})",
        state.args.listen,
        state.args.node_id,
        state.pledges.store().backend()
    );

    if state.args.dev_mode {
        warn!("Development mode enabled - error details are returned to callers");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Collect the body and hand the request to [`dispatch`]
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    info!("[{}] {} {}", addr, method, path);

    // Only submissions carry a body worth reading
    let body = if resolve(&method, &path) == Route::SubmitPledge {
        match read_body(req.into_body(), routes::pledges::MAX_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(e) => return Ok(routes::error_response(&e, state.args.dev_mode)),
        }
    } else {
        Bytes::new()
    };

    Ok(dispatch(state, &method, &path, query.as_deref(), body).await)
}

/// Collect a body, giving up as soon as it grows past `limit` bytes
async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, PledgeError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(PledgeError::BadRequest(format!(
            "Request body exceeds {} bytes",
            limit
        ))),
        Err(e) => Err(PledgeError::BadRequest(format!(
            "Failed to read request body: {}",
            e
        ))),
    }
}

/// Route a request that has already been read
pub async fn dispatch(
    state: Arc<AppState>,
    method: &Method,
    path: &str,
    query: Option<&str>,
    body: Bytes,
) -> Response<Full<Bytes>> {
    match resolve(method, path) {
        Route::Preflight => preflight_response(),
        Route::Health => routes::health_check(state).await,
        Route::SubmitPledge => routes::handle_submit(state, body).await,
        Route::ListPledges => routes::handle_list(state, query).await,
        Route::CountPledges => routes::handle_count(state, query).await,
        Route::Stats => routes::handle_stats(state).await,
        Route::MethodNotAllowed(allow) => {
            let mut response = routes::error_response(
                &PledgeError::MethodNotSupported(method.to_string()),
                state.args.dev_mode,
            );
            if let Ok(value) = hyper::header::HeaderValue::from_str(allow) {
                response.headers_mut().insert(hyper::header::ALLOW, value);
            }
            response
        }
        Route::NotFound => not_found_response(path),
    }
}

/// CORS preflight response
fn preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .body(Full::new(Bytes::from(r#"{"ok":true}"#)))
        .unwrap()
}

/// Not found response
fn not_found_response(path: &str) -> Response<Full<Bytes>> {
    routes::json_response(
        StatusCode::NOT_FOUND,
        serde_json::json!({
            "error": "Not Found",
            "path": path,
            "hint": "Use /api/pledges, /api/pledges/count or /api/stats"
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_pledge_routes() {
        assert_eq!(resolve(&Method::POST, "/api/pledges"), Route::SubmitPledge);
        assert_eq!(resolve(&Method::GET, "/api/pledges"), Route::ListPledges);
        assert_eq!(resolve(&Method::GET, "/pledges"), Route::ListPledges);
        assert_eq!(
            resolve(&Method::POST, "/.netlify/functions/add-pledge"),
            Route::SubmitPledge
        );
        assert_eq!(
            resolve(&Method::GET, "/.netlify/functions/get-pledges"),
            Route::ListPledges
        );
        assert_eq!(resolve(&Method::GET, "/api/pledges/count"), Route::CountPledges);
        assert_eq!(resolve(&Method::GET, "/api/stats"), Route::Stats);
    }

    #[test]
    fn test_resolve_unsupported_verbs() {
        assert_eq!(
            resolve(&Method::GET, "/.netlify/functions/add-pledge"),
            Route::MethodNotAllowed("POST, OPTIONS")
        );
        assert_eq!(
            resolve(&Method::DELETE, "/api/pledges"),
            Route::MethodNotAllowed("GET, POST, OPTIONS")
        );
        assert_eq!(
            resolve(&Method::PUT, "/api/stats"),
            Route::MethodNotAllowed("GET, OPTIONS")
        );
    }

    #[tokio::test]
    async fn test_read_body_stops_at_limit() {
        let small = Full::new(Bytes::from_static(b"{\"name\":\"Asha\"}"));
        assert_eq!(
            read_body(small, 64).await.unwrap(),
            Bytes::from_static(b"{\"name\":\"Asha\"}")
        );

        let large = Full::new(Bytes::from(vec![b' '; 65]));
        match read_body(large, 64).await {
            Err(PledgeError::BadRequest(msg)) => assert!(msg.contains("exceeds 64 bytes")),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_preflight_and_unknown() {
        assert_eq!(resolve(&Method::OPTIONS, "/anything"), Route::Preflight);
        assert_eq!(resolve(&Method::GET, "/nope"), Route::NotFound);
    }
}
