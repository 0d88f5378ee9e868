//! Asset model
//!
//! An [`AssetTable`] maps root-relative keys (`/about/index.htm`) to
//! immutable [`AssetRecord`]s. The table is built once per engine by
//! [`index::build`]; in dev mode records are produced per request instead.

pub mod index;
pub mod resolve;

use std::collections::HashMap;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::http::mime::{self, Encoding};

pub use index::build;
pub use resolve::{AcceptedEncodings, Resolved, Resolver};

/// Directory whose hidden contents are always servable
pub const WELL_KNOWN: &str = ".well-known";

/// Metadata for one servable file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Absolute path, always inside the engine root
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
    /// Content type of the name with any precompression suffix stripped
    pub content_type: &'static str,
    /// Precompression carried by the file name
    pub encoding: Option<Encoding>,
}

impl AssetRecord {
    /// Build a record for `key` from filesystem metadata
    pub fn new(key: &str, path: PathBuf, meta: &Metadata) -> Self {
        let (content_type, encoding) = mime::classify(key);
        Self {
            path,
            size: meta.len(),
            modified: meta.modified().unwrap_or(UNIX_EPOCH),
            content_type,
            encoding,
        }
    }

    /// Content type of the literal file name, for direct requests
    pub fn literal_content_type(&self) -> &'static str {
        mime::from_path(&self.path)
    }
}

/// Lookup table of servable assets, read-only once built
#[derive(Debug, Default, Clone)]
pub struct AssetTable {
    entries: HashMap<String, Arc<AssetRecord>>,
}

impl AssetTable {
    pub fn get(&self, key: &str) -> Option<&Arc<AssetRecord>> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn insert(&mut self, key: String, record: AssetRecord) {
        self.entries.insert(key, Arc::new(record));
    }
}

/// Derive the asset key of `path` relative to `root`
///
/// Separators become `/` and the key always starts with `/`. Returns `None`
/// for paths outside `root` or with non UTF-8 components.
pub fn asset_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut key = String::new();
    for component in relative.components() {
        let std::path::Component::Normal(part) = component else {
            return None;
        };
        key.push('/');
        key.push_str(part.to_str()?);
    }
    if key.is_empty() {
        return None;
    }
    Some(key)
}

/// Whether a key contains a hidden segment
///
/// Segments inside a `.well-known` directory are never hidden, but a dot
/// segment before it still is.
pub fn is_hidden(key: &str) -> bool {
    for segment in key.split('/') {
        if segment == WELL_KNOWN {
            return false;
        }
        if segment.starts_with('.') {
            return true;
        }
    }
    false
}
