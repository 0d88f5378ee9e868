//! Path resolution
//!
//! Maps a request path to an asset: percent-decoding with traversal checks,
//! extension and index assumption, precompressed variant negotiation and the
//! single-page fallback.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use percent_encoding::percent_decode_str;
use regex::{Regex, RegexBuilder};

use super::{index, is_hidden, AssetRecord, AssetTable};
use crate::config::ServeOptions;
use crate::error::{Result, ServeError};
use crate::http::mime::Encoding;

/// Any final segment carrying an extension
const EXTENSION_PATTERN: &str = r"[/]([A-Za-z\s\d~$._-]+\.\w+){1,}$";
/// Hidden segments, exempt from fallback when dotfiles are served
const DOTFILE_PATTERN: &str = r"/\.\w";
/// `.well-known`, exempt from fallback when dotfiles are hidden
const WELL_KNOWN_PATTERN: &str = r"/\.well-known";

/// Encodings the client accepts, from `Accept-Encoding`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceptedEncodings {
    pub gzip: bool,
    pub brotli: bool,
}

impl AcceptedEncodings {
    /// Parse an `Accept-Encoding` value
    ///
    /// Codings explicitly refused with `q=0` are not accepted.
    pub fn parse(header: Option<&str>) -> Self {
        let mut accepted = Self::default();
        for item in header.unwrap_or_default().split(',') {
            let mut params = item.split(';');
            let coding = params.next().unwrap_or_default().trim();
            if params.any(is_zero_quality) {
                continue;
            }
            if coding.eq_ignore_ascii_case("gzip") || coding.eq_ignore_ascii_case("x-gzip") {
                accepted.gzip = true;
            } else if coding.eq_ignore_ascii_case("br") || coding.eq_ignore_ascii_case("brotli")
            {
                accepted.brotli = true;
            }
        }
        accepted
    }
}

fn is_zero_quality(param: &str) -> bool {
    param
        .trim()
        .strip_prefix("q=")
        .and_then(|q| q.parse::<f32>().ok())
        .is_some_and(|q| q <= 0.0)
}

/// Successful resolution
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Key of the asset that was selected
    pub key: String,
    pub record: Arc<AssetRecord>,
    /// Encoding chosen by negotiation; `None` for identity and for direct
    /// requests of a compressed file
    pub negotiated: Option<Encoding>,
}

/// Where candidates are looked up
#[derive(Debug)]
enum Source {
    /// Table built once at construction
    Indexed(AssetTable),
    /// Fresh filesystem probe per candidate (dev mode)
    Live { root: PathBuf, dotfiles: bool },
}

/// Request path to asset resolver
#[derive(Debug)]
pub struct Resolver {
    source: Source,
    extensions: Vec<String>,
    fallback: Option<String>,
    /// `None` when ignore checking is bypassed
    ignores: Option<Vec<Regex>>,
    gzip: bool,
    brotli: bool,
}

impl Resolver {
    /// Build a resolver for a canonical `root`
    ///
    /// Indexes the whole tree unless `options.dev` is set.
    pub fn new(root: &Path, options: &ServeOptions) -> Result<Self> {
        let source = if options.dev {
            Source::Live {
                root: root.to_path_buf(),
                dotfiles: options.dotfiles,
            }
        } else {
            Source::Indexed(index::build(root, options)?)
        };

        Ok(Self {
            source,
            extensions: options.extensions.clone(),
            fallback: options.single.fallback(),
            ignores: compile_ignores(options)?,
            gzip: options.gzip,
            brotli: options.brotli,
        })
    }

    /// Indexed table, `None` in dev mode
    pub const fn table(&self) -> Option<&AssetTable> {
        match &self.source {
            Source::Indexed(table) => Some(table),
            Source::Live { .. } => None,
        }
    }

    /// Resolve a decoded request path, applying the single-page fallback
    pub async fn resolve(&self, pathname: &str, accepted: AcceptedEncodings) -> Option<Resolved> {
        if let Some(found) = self.lookup(pathname, accepted).await {
            return Some(found);
        }
        let fallback = self.fallback.as_deref()?;
        if self.is_ignored(pathname) {
            return None;
        }
        self.lookup(fallback, accepted).await
    }

    /// Whether `pathname` is exempt from the single-page fallback
    pub fn is_ignored(&self, pathname: &str) -> bool {
        self.ignores
            .as_ref()
            .is_some_and(|patterns| patterns.iter().any(|re| re.is_match(pathname)))
    }

    async fn lookup(&self, pathname: &str, accepted: AcceptedEncodings) -> Option<Resolved> {
        for candidate in candidates(pathname, &self.extensions) {
            for (key, negotiated) in self.variants(&candidate, accepted) {
                if let Some(record) = self.probe(&key).await {
                    return Some(Resolved {
                        key,
                        record,
                        negotiated,
                    });
                }
            }
        }
        None
    }

    /// Encoding variants of a candidate in preference order, bare last
    fn variants(&self, candidate: &str, accepted: AcceptedEncodings) -> Vec<(String, Option<Encoding>)> {
        let mut out = Vec::with_capacity(3);
        if self.brotli && accepted.brotli {
            out.push((
                format!("{candidate}{}", Encoding::Brotli.suffix()),
                Some(Encoding::Brotli),
            ));
        }
        if self.gzip && accepted.gzip {
            out.push((
                format!("{candidate}{}", Encoding::Gzip.suffix()),
                Some(Encoding::Gzip),
            ));
        }
        out.push((candidate.to_string(), None));
        out
    }

    async fn probe(&self, key: &str) -> Option<Arc<AssetRecord>> {
        match &self.source {
            Source::Indexed(table) => table.get(key).cloned(),
            Source::Live { root, dotfiles } => probe_live(root, *dotfiles, key).await,
        }
    }
}

/// Stat one candidate on disk
///
/// Directories are skipped so the next candidate is tried.
async fn probe_live(root: &Path, dotfiles: bool, key: &str) -> Option<Arc<AssetRecord>> {
    if !dotfiles && is_hidden(key) {
        return None;
    }
    let path = root.join(key.trim_start_matches('/'));
    let meta = tokio::fs::metadata(&path).await.ok()?;
    if !meta.is_file() {
        return None;
    }
    let canonical = tokio::fs::canonicalize(&path).await.ok()?;
    if !canonical.starts_with(root) {
        return None;
    }
    Some(Arc::new(AssetRecord::new(key, path, &meta)))
}

fn compile_ignores(options: &ServeOptions) -> Result<Option<Vec<Regex>>> {
    if options.ignores.is_disabled() {
        return Ok(None);
    }

    let hidden = if options.dotfiles {
        DOTFILE_PATTERN
    } else {
        WELL_KNOWN_PATTERN
    };

    let mut patterns = Vec::with_capacity(2 + options.ignores.patterns().len());
    for builtin in [EXTENSION_PATTERN, hidden] {
        patterns.push(compile(builtin)?);
    }
    for user in options.ignores.patterns() {
        patterns.push(compile(user)?);
    }
    Ok(Some(patterns))
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ServeError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Decode a raw request path into a root-relative lookup path
///
/// Strips query and fragment. Returns `None` for an encoded separator
/// (`%2F`, `%5C`), invalid UTF-8, NUL bytes, backslashes, and `..`
/// segments; the caller treats all of them as not found. `.` segments are
/// dropped.
pub fn decode_path(raw: &str) -> Option<String> {
    let path = raw.split(['?', '#']).next().unwrap_or_default();

    let upper = path.to_ascii_uppercase();
    if upper.contains("%2F") || upper.contains("%5C") {
        return None;
    }

    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    if decoded.contains(['\0', '\\']) {
        return None;
    }

    if decoded.split('/').any(|s| s == "..") {
        return None;
    }

    let mut normalized = String::with_capacity(decoded.len() + 1);
    for segment in decoded.split('/').skip_while(|s| s.is_empty()).filter(|s| *s != ".") {
        normalized.push('/');
        normalized.push_str(segment);
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    Some(normalized)
}

/// Whether the final segment contains an extension
fn has_extension(path: &str) -> bool {
    path.rsplit('/').next().is_some_and(|last| last.contains('.'))
}

/// Ordered lookup candidates before encoding expansion
///
/// A direct request (final extension) only tries itself. Otherwise every
/// `{path}.{ext}` comes before every `{path}/index.{ext}`.
fn candidates(path: &str, extensions: &[String]) -> Vec<String> {
    if has_extension(path) {
        return vec![path.to_string()];
    }

    let base = path.trim_end_matches('/');
    let suffix = |ext: &String| {
        if ext.is_empty() {
            String::new()
        } else {
            format!(".{}", ext.trim_start_matches('.'))
        }
    };

    let mut out = Vec::with_capacity(extensions.len() * 2);
    if !base.is_empty() {
        out.extend(extensions.iter().map(|ext| format!("{base}{}", suffix(ext))));
    }
    out.extend(
        extensions
            .iter()
            .map(|ext| format!("{base}/index{}", suffix(ext))),
    );
    out
}
