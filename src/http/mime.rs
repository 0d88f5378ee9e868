//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension, and
//! recognizes precompression suffixes so a negotiated `app.js.br` is typed
//! as JavaScript rather than as an opaque archive.

use std::path::Path;

/// Sentinel for unknown extensions
pub const UNKNOWN: &str = "application/octet-stream";

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use staticd::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), "text/html;charset=utf-8");
/// assert_eq!(get_content_type(Some("mp4")), "video/mp4");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    let Some(ext) = extension else {
        return UNKNOWN;
    };

    match ext.to_ascii_lowercase().as_str() {
        // Text
        "html" | "htm" => "text/html;charset=utf-8",
        "css" => "text/css",
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "xml" => "application/xml",
        "ics" => "text/calendar",

        // JavaScript/WASM
        "js" | "mjs" | "cjs" => "application/javascript",
        "json" | "map" => "application/json",
        "webmanifest" => "application/manifest+json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "avif" => "image/avif",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",

        // Audio
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",

        // Archives and documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "br" => "application/x-brotli",
        "tar" => "application/x-tar",

        _ => UNKNOWN,
    }
}

/// Content-Type of a file name, using its literal extension
pub fn from_path(path: &Path) -> &'static str {
    get_content_type(path.extension().and_then(|e| e.to_str()))
}

/// Precompression encodings recognized by file suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Gzip,
    Brotli,
}

impl Encoding {
    /// File suffix carried by a precompressed sibling
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Gzip => ".gz",
            Self::Brotli => ".br",
        }
    }

    /// `Content-Encoding` token
    pub const fn token(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Brotli => "br",
        }
    }

    /// Detect a precompression suffix and return the name without it
    pub fn strip(name: &str) -> Option<(Self, &str)> {
        [Self::Brotli, Self::Gzip].into_iter().find_map(|enc| {
            name.strip_suffix(enc.suffix())
                .filter(|rest| !rest.is_empty() && !rest.ends_with('/'))
                .map(|rest| (enc, rest))
        })
    }
}

/// Content-Type and precompression of a file name
///
/// `bundle.js.gz` is `application/javascript` compressed with gzip; the
/// archive type only applies when the variant is requested directly.
pub fn classify(name: &str) -> (&'static str, Option<Encoding>) {
    match Encoding::strip(name) {
        Some((enc, inner)) => (from_path(Path::new(inner)), Some(enc)),
        None => (from_path(Path::new(name)), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(get_content_type(Some("html")), "text/html;charset=utf-8");
        assert_eq!(get_content_type(Some("css")), "text/css");
        assert_eq!(get_content_type(Some("js")), "application/javascript");
        assert_eq!(get_content_type(Some("json")), "application/json");
        assert_eq!(get_content_type(Some("PNG")), "image/png");
        assert_eq!(get_content_type(Some("mp4")), "video/mp4");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_content_type(Some("xyz")), UNKNOWN);
        assert_eq!(get_content_type(None), UNKNOWN);
        assert_eq!(from_path(Path::new("Makefile")), UNKNOWN);
    }

    #[test]
    fn test_classify_precompressed() {
        assert_eq!(
            classify("/bundle.js.gz"),
            ("application/javascript", Some(Encoding::Gzip))
        );
        assert_eq!(
            classify("/index.html.br"),
            ("text/html;charset=utf-8", Some(Encoding::Brotli))
        );
        assert_eq!(classify("/style.css"), ("text/css", None));
        // A bare ".gz" name has nothing left to type
        assert_eq!(classify("/.gz"), (UNKNOWN, None));
    }
}
