//! Request dispatcher
//!
//! [`Engine`] owns the resolver (and through it the asset table) and turns
//! an [`AssetRequest`] into a response: resolve, conditional check, default
//! headers, user header hook, then range slicing and streaming.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hyper::header::ETAG;
use hyper::{HeaderMap, Method, Response};

use super::request::AssetRequest;
use super::respond::respond;
use crate::assets::index::canonical_root;
use crate::assets::resolve::decode_path;
use crate::assets::{AcceptedEncodings, AssetRecord, Resolver};
use crate::config::ServeOptions;
use crate::error::Result;
use crate::http::{self, cache, headers, Body};
use crate::logger;

/// Replaces the default 404 when nothing resolves
pub type NoMatchHook = Arc<dyn Fn(&AssetRequest) -> Response<Body> + Send + Sync>;

/// Runs after the default headers are set; receives the decoded request
/// path and the selected record
pub type SetHeadersHook = Arc<dyn Fn(&mut HeaderMap, &str, &AssetRecord) + Send + Sync>;

/// Builder for an [`Engine`] with optional hooks
pub struct EngineBuilder {
    root: PathBuf,
    options: ServeOptions,
    on_no_match: Option<NoMatchHook>,
    set_headers: Option<SetHeadersHook>,
}

impl EngineBuilder {
    pub fn new(root: impl Into<PathBuf>, options: ServeOptions) -> Self {
        Self {
            root: root.into(),
            options,
            on_no_match: None,
            set_headers: None,
        }
    }

    #[must_use]
    pub fn on_no_match<F>(mut self, hook: F) -> Self
    where
        F: Fn(&AssetRequest) -> Response<Body> + Send + Sync + 'static,
    {
        self.on_no_match = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn set_headers<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut HeaderMap, &str, &AssetRecord) + Send + Sync + 'static,
    {
        self.set_headers = Some(Arc::new(hook));
        self
    }

    /// Validate the root and, outside dev mode, index it
    ///
    /// Blocks until the asset table is complete.
    pub fn build(self) -> Result<Engine> {
        let root = canonical_root(&self.root)?;
        let resolver = Resolver::new(&root, &self.options)?;
        Ok(Engine {
            root,
            options: self.options,
            resolver,
            on_no_match: self.on_no_match,
            set_headers: self.set_headers,
        })
    }
}

/// Static asset engine
pub struct Engine {
    root: PathBuf,
    options: ServeOptions,
    resolver: Resolver,
    on_no_match: Option<NoMatchHook>,
    set_headers: Option<SetHeadersHook>,
}

impl Engine {
    /// Create an engine with default hooks
    ///
    /// Fails with `DirectoryNotFound` right away when `root` is missing.
    pub fn new(root: impl Into<PathBuf>, options: ServeOptions) -> Result<Self> {
        EngineBuilder::new(root, options).build()
    }

    pub fn builder(root: impl Into<PathBuf>, options: ServeOptions) -> EngineBuilder {
        EngineBuilder::new(root, options)
    }

    /// Canonical root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub const fn options(&self) -> &ServeOptions {
        &self.options
    }

    /// Number of indexed assets, `None` in dev mode
    pub fn asset_count(&self) -> Option<usize> {
        self.resolver.table().map(crate::assets::AssetTable::len)
    }

    /// Serve `req`, applying the not-found policy on a miss
    pub async fn handle(&self, req: &AssetRequest) -> Response<Body> {
        match self.serve(req).await {
            Some(response) => response,
            None => self.not_found(req),
        }
    }

    /// Serve `req`, delegating to `next` on a miss
    pub async fn handle_or_next<F, Fut>(&self, req: &AssetRequest, next: F) -> Response<Body>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Response<Body>>,
    {
        match self.serve(req).await {
            Some(response) => response,
            None => next().await,
        }
    }

    /// `onNoMatch` hook or an empty 404
    pub fn not_found(&self, req: &AssetRequest) -> Response<Body> {
        match &self.on_no_match {
            Some(hook) => hook(req),
            None => http::build_404_response(),
        }
    }

    /// Serve `req` if it resolves to an asset
    ///
    /// `None` covers every miss alike: unsupported method, undecodable or
    /// escaping path, hidden file, absent file.
    pub async fn serve(&self, req: &AssetRequest) -> Option<Response<Body>> {
        if req.method != Method::GET && req.method != Method::HEAD {
            return None;
        }

        let pathname = decode_path(&req.path)?;
        let accepted = AcceptedEncodings::parse(req.accept_encoding());
        let resolved = self.resolver.resolve(&pathname, accepted).await?;

        let mut headers = headers::build(&resolved, &self.options);

        if self.options.etag {
            let etag = headers.get(ETAG).and_then(|v| v.to_str().ok());
            if etag.is_some_and(|etag| cache::check_etag_match(req.if_none_match(), etag)) {
                return Some(http::build_304_response(&headers));
            }
        }

        if let Some(hook) = &self.set_headers {
            hook(&mut headers, &pathname, &resolved.record);
        }

        match respond(req, &resolved.record, headers).await {
            Ok(response) => Some(response),
            Err(e) => {
                logger::log_error(&format!(
                    "Failed to open '{}': {e}",
                    resolved.record.path.display()
                ));
                None
            }
        }
    }
}
