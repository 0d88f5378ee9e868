// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Directory whose contents are served
    #[serde(default = "default_dir")]
    pub dir: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub serve: ServeOptions,
}

fn default_dir() -> String {
    ".".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            serve: ServeOptions::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    #[serde(default = "default_keep_alive")]
    pub keep_alive: bool,
}

#[allow(clippy::missing_const_for_fn)]
fn default_keep_alive() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5000,
            workers: None,
            keep_alive: default_keep_alive(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (dev, combined, common, json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "dev".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Behaviour of the asset engine
///
/// Everything here is plain data; hooks that need code (`on_no_match`,
/// `set_headers`) are installed on [`EngineBuilder`](crate::handler::EngineBuilder).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServeOptions {
    /// Skip the asset table and stat the filesystem on every request
    pub dev: bool,
    /// Emit weak `ETag` headers and answer `If-None-Match` with 304
    pub etag: bool,
    /// `Cache-Control` max-age in seconds; no header when unset
    pub max_age: Option<u64>,
    /// Append `immutable` to `Cache-Control` (requires `max_age`)
    pub immutable: bool,
    /// Extensions assumed for extensionless requests, in order
    pub extensions: Vec<String>,
    /// Serve hidden paths outside `.well-known`
    pub dotfiles: bool,
    /// Single-page application fallback
    pub single: SinglePage,
    /// Paths exempt from the single-page fallback
    pub ignores: Ignores,
    /// Negotiate precompressed `*.gz` siblings
    pub gzip: bool,
    /// Negotiate precompressed `*.br` siblings
    pub brotli: bool,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            dev: false,
            etag: false,
            max_age: None,
            immutable: false,
            extensions: vec!["html".to_string(), "htm".to_string()],
            dotfiles: false,
            single: SinglePage::Disabled,
            ignores: Ignores::Default,
            gzip: false,
            brotli: false,
        }
    }
}

/// Single-page application fallback mode
///
/// Accepts `true`/`false` or a document path in configuration files.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(from = "SinglePageRepr", into = "SinglePageRepr")]
pub enum SinglePage {
    #[default]
    Disabled,
    /// Fall back to the root document (`/`)
    Root,
    /// Fall back to a specific document
    Path(String),
}

impl SinglePage {
    /// Request path used when nothing else matched
    pub fn fallback(&self) -> Option<String> {
        match self {
            Self::Disabled => None,
            Self::Root => Some("/".to_string()),
            Self::Path(p) => Some(format!("/{}", p.trim_start_matches('/'))),
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum SinglePageRepr {
    Flag(bool),
    Path(String),
}

impl From<SinglePageRepr> for SinglePage {
    fn from(repr: SinglePageRepr) -> Self {
        match repr {
            SinglePageRepr::Flag(true) => Self::Root,
            SinglePageRepr::Flag(false) => Self::Disabled,
            // Environment variables arrive as strings
            SinglePageRepr::Path(p) => match p.as_str() {
                "true" | "" => Self::Root,
                "false" => Self::Disabled,
                _ => Self::Path(p),
            },
        }
    }
}

impl From<SinglePage> for SinglePageRepr {
    fn from(single: SinglePage) -> Self {
        match single {
            SinglePage::Disabled => Self::Flag(false),
            SinglePage::Root => Self::Flag(true),
            SinglePage::Path(p) => Self::Path(p),
        }
    }
}

/// Fallback exemption patterns
///
/// `false` turns ignore checking off entirely, so even extensioned paths
/// fall back. A single pattern or a list adds to the built-in patterns.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(from = "IgnoresRepr", into = "IgnoresRepr")]
pub enum Ignores {
    /// Built-in patterns only
    #[default]
    Default,
    /// No ignore checking at all
    Disabled,
    /// Built-in patterns plus these case-insensitive regular expressions
    Patterns(Vec<String>),
}

impl Ignores {
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    pub fn patterns(&self) -> &[String] {
        match self {
            Self::Patterns(p) => p,
            Self::Default | Self::Disabled => &[],
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum IgnoresRepr {
    Flag(bool),
    One(String),
    Many(Vec<String>),
}

impl From<IgnoresRepr> for Ignores {
    fn from(repr: IgnoresRepr) -> Self {
        match repr {
            IgnoresRepr::Flag(false) => Self::Disabled,
            IgnoresRepr::Flag(true) => Self::Default,
            IgnoresRepr::One(p) if p == "false" => Self::Disabled,
            IgnoresRepr::One(p) => Self::Patterns(vec![p]),
            IgnoresRepr::Many(list) if list.is_empty() => Self::Default,
            IgnoresRepr::Many(list) => Self::Patterns(list),
        }
    }
}

impl From<Ignores> for IgnoresRepr {
    fn from(ignores: Ignores) -> Self {
        match ignores {
            Ignores::Default => Self::Flag(true),
            Ignores::Disabled => Self::Flag(false),
            Ignores::Patterns(list) => Self::Many(list),
        }
    }
}
