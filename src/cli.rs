//! Command-line interface definitions.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, Ignores, SinglePage};

/// Serve a directory of static assets
#[derive(Parser, Debug, Clone)]
#[command(name = "staticd", version, about, long_about = None)]
pub struct Cli {
    /// Directory to serve (default: current directory)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Config file path
    #[arg(long, default_value = "staticd.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable dev mode: no asset table, files are looked up on every request
    #[arg(short = 'D', long)]
    pub dev: bool,

    /// Enable weak ETag headers and 304 responses
    #[arg(short, long)]
    pub etag: bool,

    /// Serve hidden files and directories
    #[arg(short, long)]
    pub dotfiles: bool,

    /// Allow cross-origin requests
    #[arg(short, long)]
    pub cors: bool,

    /// Serve precompressed `.gz` files (default: true)
    #[arg(short = 'G', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub gzip: Option<bool>,

    /// Serve precompressed `.br` files (default: true)
    #[arg(short = 'B', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub brotli: Option<bool>,

    /// `Cache-Control` max-age in seconds
    #[arg(short, long = "maxage", value_name = "SECONDS")]
    pub max_age: Option<u64>,

    /// Mark assets as immutable (needs --maxage)
    #[arg(short, long)]
    pub immutable: bool,

    /// Single-page application mode, optionally with a fallback document
    #[arg(short, long, value_name = "PATH", num_args = 0..=1, default_missing_value = "")]
    pub single: Option<String>,

    /// Pattern exempt from the single-page fallback (repeatable, `false` disables)
    #[arg(short = 'I', long = "ignores", value_name = "PATTERN")]
    pub ignores: Vec<String>,

    /// Disable access logging
    #[arg(short, long)]
    pub quiet: bool,

    /// Hostname to bind
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Override loaded configuration with the flags that were given
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.dir {
            config.dir = dir.to_string_lossy().into_owned();
        }
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.quiet {
            config.logging.access_log = false;
        }

        let serve = &mut config.serve;
        serve.dev |= self.dev;
        serve.etag |= self.etag;
        serve.dotfiles |= self.dotfiles;
        serve.immutable |= self.immutable;
        if let Some(gzip) = self.gzip {
            serve.gzip = gzip;
        }
        if let Some(brotli) = self.brotli {
            serve.brotli = brotli;
        }
        if self.max_age.is_some() {
            serve.max_age = self.max_age;
        }
        if let Some(single) = &self.single {
            serve.single = if single.is_empty() {
                SinglePage::Root
            } else {
                SinglePage::Path(single.clone())
            };
        }
        if self.ignores.iter().any(|p| p == "false") {
            serve.ignores = Ignores::Disabled;
        } else if !self.ignores.is_empty() {
            serve.ignores = Ignores::Patterns(self.ignores.clone());
        }
    }
}
