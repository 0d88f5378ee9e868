//! HTTP service adapter
//!
//! Connects hyper connections to the [`Engine`](super::Engine): request
//! normalization, access logging and the CLI's CORS hook.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use hyper::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_LENGTH,
    REFERER, USER_AGENT,
};
use hyper::{HeaderMap, Request, Response, Version};

use super::request::AssetRequest;
use crate::assets::AssetRecord;
use crate::config::AppState;
use crate::http::Body;
use crate::logger::{self, AccessLogEntry};

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Body>, Infallible> {
    let start = Instant::now();
    let asset_req = AssetRequest::from_request(&req);

    let response = state.engine.handle(&asset_req).await;

    if state.access_log() {
        let entry = access_entry(&req, peer_addr, &response, start);
        logger::log_access(&entry, state.access_log_format());
    }
    Ok(response)
}

fn access_entry<B>(
    req: &Request<B>,
    peer_addr: SocketAddr,
    response: &Response<Body>,
    start: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_str(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

const fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

/// `set_headers` hook allowing cross-origin requests
pub fn cors(headers: &mut HeaderMap, _pathname: &str, _record: &AssetRecord) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Origin, Content-Type, Accept, Range"),
    );
}
