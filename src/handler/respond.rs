//! Range handling and final response assembly
//!
//! Turns a resolved asset plus its header set into a 200, 206 or 416.
//! The conditional (304) short-circuit happens earlier, in the engine.

use std::io;

use hyper::header::{HeaderValue, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE};
use hyper::{HeaderMap, Response, StatusCode};

use super::request::AssetRequest;
use crate::assets::AssetRecord;
use crate::http::range::RangeParseResult;
use crate::http::headers::insert_str;
use crate::http::{self, body, Body};

/// Build the response for `record` with the given headers
///
/// `HEAD` requests get the same status and headers with an empty body.
pub async fn respond(
    req: &AssetRequest,
    record: &AssetRecord,
    mut headers: HeaderMap,
) -> io::Result<Response<Body>> {
    let size = record.size;

    let (status, range) = match http::parse_range_header(req.range(), size) {
        RangeParseResult::Valid(range) => {
            insert_str(&mut headers, CONTENT_RANGE, &range.content_range(size));
            headers.insert(CONTENT_LENGTH, HeaderValue::from(range.content_length()));
            headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));
            (StatusCode::PARTIAL_CONTENT, Some(range))
        }
        RangeParseResult::NotSatisfiable => return Ok(http::build_416_response(size, headers)),
        RangeParseResult::None => (StatusCode::OK, None),
    };

    let body = if req.is_head() {
        body::empty()
    } else {
        body::file(&record.path, range, size).await?
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
