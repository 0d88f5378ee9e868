//! HTTP response building module
//!
//! Builders for the bodiless status responses of the engine.

use hyper::header::{
    HeaderValue, ACCEPT_RANGES, CACHE_CONTROL, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_RANGE,
    CONTENT_TYPE, ETAG, VARY,
};
use hyper::{HeaderMap, Response, StatusCode};

use super::body::{self, Body};
use super::headers::insert_str;
use super::range;

/// Build 304 Not Modified response
///
/// Carries the validators and caching headers of the full response.
pub fn build_304_response(headers: &HeaderMap) -> Response<Body> {
    let mut builder = Response::builder().status(StatusCode::NOT_MODIFIED);
    for name in [ETAG, CACHE_CONTROL, VARY] {
        if let Some(value) = headers.get(&name) {
            builder = builder.header(name, value.clone());
        }
    }
    builder.body(body::empty()).unwrap_or_else(|e| {
        log_build_error("304", &e);
        empty_response(StatusCode::NOT_MODIFIED)
    })
}

/// Build 404 Not Found response with an empty body
pub fn build_404_response() -> Response<Body> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(CONTENT_LENGTH, 0)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            empty_response(StatusCode::NOT_FOUND)
        })
}

/// Build 416 Range Not Satisfiable response
///
/// Keeps the headers prepared for the full response (including those added
/// by a `set_headers` hook) except the ones describing a body.
pub fn build_416_response(file_size: u64, mut headers: HeaderMap) -> Response<Body> {
    for name in [CONTENT_TYPE, CONTENT_ENCODING, ACCEPT_RANGES] {
        headers.remove(name);
    }
    insert_str(
        &mut headers,
        CONTENT_RANGE,
        &range::unsatisfied_content_range(file_size),
    );
    headers.insert(CONTENT_LENGTH, HeaderValue::from(0u64));

    let mut response = empty_response(StatusCode::RANGE_NOT_SATISFIABLE);
    *response.headers_mut() = headers;
    response
}

fn empty_response(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(body::empty());
    *response.status_mut() = status;
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
