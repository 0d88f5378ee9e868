//! Response header builder
//!
//! Every response gets a freshly built [`HeaderMap`]; nothing is cached on
//! the asset record, so per-request fields such as `Content-Range` cannot
//! leak into later responses.

use std::time::SystemTime;

use chrono::{DateTime, Utc};
use hyper::header::{
    HeaderName, HeaderValue, ACCEPT_RANGES, CACHE_CONTROL, CONTENT_ENCODING, CONTENT_LENGTH,
    CONTENT_TYPE, ETAG, LAST_MODIFIED, VARY,
};
use hyper::HeaderMap;

use super::cache::{self, CachePolicy};
use crate::assets::Resolved;
use crate::config::ServeOptions;

/// Format a timestamp as an HTTP date (IMF-fixdate)
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Insert a dynamic header value, skipping values that are not valid
pub fn insert_str(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    if let Ok(v) = HeaderValue::from_str(value) {
        headers.insert(name, v);
    }
}

/// Default headers for a resolved asset
///
/// A negotiated variant is typed by its uncompressed name and carries
/// `Content-Encoding`; a compressed file requested directly keeps its
/// literal type.
pub fn build(resolved: &Resolved, options: &ServeOptions) -> HeaderMap {
    let record = &resolved.record;
    let mut headers = HeaderMap::new();

    let content_type = match resolved.negotiated {
        Some(_) => record.content_type,
        None => record.literal_content_type(),
    };
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(record.size));
    insert_str(&mut headers, LAST_MODIFIED, &http_date(record.modified));
    headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    if options.etag {
        insert_str(
            &mut headers,
            ETAG,
            &cache::generate_etag(record.size, record.modified),
        );
    }

    if let Some(policy) = CachePolicy::from_options(options) {
        insert_str(&mut headers, CACHE_CONTROL, &policy.to_header_value());
    }

    if let Some(encoding) = resolved.negotiated {
        headers.insert(CONTENT_ENCODING, HeaderValue::from_static(encoding.token()));
    }

    if options.gzip || options.brotli {
        headers.insert(VARY, HeaderValue::from_static("Accept-Encoding"));
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetRecord;
    use crate::http::mime::Encoding;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::{Duration, UNIX_EPOCH};

    fn resolved(name: &str, negotiated: Option<Encoding>) -> Resolved {
        let (content_type, encoding) = crate::http::mime::classify(name);
        Resolved {
            key: name.to_string(),
            record: Arc::new(AssetRecord {
                path: PathBuf::from(format!("/srv{name}")),
                size: 300,
                modified: UNIX_EPOCH + Duration::from_secs(784_111_777),
                content_type,
                encoding,
            }),
            negotiated,
        }
    }

    fn get<'a>(headers: &'a HeaderMap, name: HeaderName) -> Option<&'a str> {
        headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_http_date() {
        let time = UNIX_EPOCH + Duration::from_secs(784_111_777);
        assert_eq!(http_date(time), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_default_headers() {
        let headers = build(&resolved("/index.html", None), &ServeOptions::default());
        assert_eq!(get(&headers, CONTENT_TYPE), Some("text/html;charset=utf-8"));
        assert_eq!(get(&headers, CONTENT_LENGTH), Some("300"));
        assert_eq!(
            get(&headers, LAST_MODIFIED),
            Some("Sun, 06 Nov 1994 08:49:37 GMT")
        );
        assert!(headers.get(ETAG).is_none());
        assert!(headers.get(CACHE_CONTROL).is_none());
        assert!(headers.get(VARY).is_none());
    }

    #[test]
    fn test_etag_and_cache_control() {
        let options = ServeOptions {
            etag: true,
            max_age: Some(0),
            ..ServeOptions::default()
        };
        let headers = build(&resolved("/index.html", None), &options);
        assert_eq!(
            get(&headers, ETAG),
            Some(format!("W/\"12c-{:x}\"", 784_111_777_000_u64).as_str())
        );
        assert_eq!(get(&headers, CACHE_CONTROL), Some("public,max-age=0"));

        let options = ServeOptions {
            immutable: true,
            ..ServeOptions::default()
        };
        let headers = build(&resolved("/index.html", None), &options);
        assert!(headers.get(CACHE_CONTROL).is_none());
    }

    #[test]
    fn test_negotiated_variant() {
        let options = ServeOptions {
            gzip: true,
            ..ServeOptions::default()
        };
        let headers = build(&resolved("/app.js.gz", Some(Encoding::Gzip)), &options);
        assert_eq!(get(&headers, CONTENT_TYPE), Some("application/javascript"));
        assert_eq!(get(&headers, CONTENT_ENCODING), Some("gzip"));
        assert_eq!(get(&headers, VARY), Some("Accept-Encoding"));
    }

    #[test]
    fn test_direct_compressed_request() {
        let headers = build(&resolved("/app.js.gz", None), &ServeOptions::default());
        assert_eq!(get(&headers, CONTENT_TYPE), Some("application/gzip"));
        assert!(headers.get(CONTENT_ENCODING).is_none());
    }
}
