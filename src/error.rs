//! Error types
//!
//! Construction-time failures of the engine. Request-time misses are never
//! errors: they collapse into the not-found policy of the dispatcher.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while building an [`Engine`](crate::handler::Engine) or
/// loading its configuration.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The root directory is missing or is not a directory
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Filesystem failure while indexing the root
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An `ignores` entry is not a valid regular expression
    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Layered configuration could not be loaded
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

pub type Result<T, E = ServeError> = std::result::Result<T, E>;
