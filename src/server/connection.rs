// Connection handling module
// Accepts TCP connections and serves HTTP/1.1 requests through the dispatcher.

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderMap, HeaderName, CONTENT_LENGTH, REFERER, USER_AGENT};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;

use crate::config::HttpConfig;
use crate::dispatch::{RequestContext, ResponseParts};
use crate::logger::{self, AccessLogEntry};

use super::ServerState;

/// Accept a connection, enforcing the connection limit and logging.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<ServerState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(conn_counter));
}

/// Serve a single connection in a spawned task: HTTP/1.1 with keep-alive, a
/// whole-connection timeout of max(read, write), and the dispatcher behind
/// `service_fn`. Decrements the connection counter when done.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<ServerState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let keep_alive = state.config.performance.keep_alive_timeout > 0;
        let timeout_duration = std::time::Duration::from_secs(std::cmp::max(
            state.config.performance.read_timeout,
            state.config.performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        builder.keep_alive(keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&service_state);
                async move { handle_request(req, peer_addr, state).await }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection timeout after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Serve one request: pre-check the declared body size, buffer the body,
/// bind a fresh request context, dispatch, and serialize the result.
async fn handle_request(
    req: Request<Incoming>,
    peer_addr: std::net::SocketAddr,
    state: Arc<ServerState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let verb = req.method().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();

    let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), verb.clone(), path.clone());
    entry.query = query.clone();
    entry.http_version = http_version;
    entry.referer = header_string(req.headers(), &REFERER);
    entry.user_agent = header_string(req.headers(), &USER_AGENT);

    if state.config.logging.show_headers {
        logger::log_headers_count(req.headers().len());
    }

    let result = if declared_body_too_large(req.headers(), state.config.http.max_body_size) {
        logger::log_error(&format!(
            "Request body too large (max: {} bytes)",
            state.config.http.max_body_size
        ));
        ResponseParts::with_body(413, "Request Entity Too Large")
    } else {
        let (parts, body) = req.into_parts();
        match body.collect().await {
            Ok(collected) => {
                // Fresh context per request: shared handler closures can
                // never observe another request's state
                let ctx = RequestContext::new(
                    verb,
                    path,
                    query.as_deref(),
                    parts.headers,
                    collected.to_bytes(),
                );
                state.dispatcher.dispatch(&ctx)
            }
            Err(err) => {
                logger::log_error(&format!("Failed to read request body: {err}"));
                ResponseParts::with_body(400, "Bad Request")
            }
        }
    };

    entry.status = result.status;
    entry.body_bytes = result.body_len();
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    if state.config.logging.access_log {
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(build_response(result, &state.config.http))
}

/// Check the declared Content-Length against the configured limit. A
/// missing or unparsable header skips the check; hyper enforces message
/// framing separately.
fn declared_body_too_large(headers: &HeaderMap, max_body_size: u64) -> bool {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|size_str| size_str.parse::<u64>().ok())
        .is_some_and(|size| size > max_body_size)
}

/// Convert the engine's response triple into a hyper response.
///
/// Handler-supplied headers are applied verbatim; a Content-Type default,
/// the configured Server name, and the CORS header (when enabled) are added
/// on top. A header or status the builder rejects downgrades the whole
/// response to a plain 500 (host-layer policy for handler contract
/// violations).
fn build_response(parts: ResponseParts, http: &HttpConfig) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(parts.status);

    let mut has_content_type = false;
    for (name, value) in &parts.headers {
        if name.eq_ignore_ascii_case("content-type") {
            has_content_type = true;
        }
        builder = builder.header(name.as_str(), value.as_str());
    }

    if !has_content_type {
        builder = builder.header("Content-Type", &http.default_content_type);
    }
    builder = builder.header("Server", &http.server_name);
    if http.enable_cors {
        builder = builder.header("Access-Control-Allow-Origin", "*");
    }

    let body = parts.body_bytes();
    match builder.body(Full::new(body)) {
        Ok(response) => response,
        Err(err) => {
            logger::log_error(&format!("Failed to build response: {err}"));
            server_fault_response()
        }
    }
}

/// Plain 500 used when a handler-produced triple cannot be serialized.
fn server_fault_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from_static(b"Internal Server Error")))
        .expect("Failed to build 500 response")
}

fn header_string(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}
