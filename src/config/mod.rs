// Configuration module entry point
// Layered loading (file, environment, defaults) and shared runtime state

mod state;
mod types;

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;

use crate::error::Result;

// Re-export public types
pub use state::AppState;
pub use types::{Config, Ignores, LoggingConfig, ServeOptions, ServerConfig, SinglePage};

impl Config {
    /// Load configuration from the given file path
    ///
    /// The file is optional. `STATICD_*` environment variables (nested keys
    /// separated by `__`, e.g. `STATICD_SERVE__ETAG`) override it.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("STATICD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("dir", ".")?
            .set_default("server.host", "localhost")?
            .set_default("server.port", 5000)?
            .set_default("server.keep_alive", true)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "dev")?
            // The binary negotiates precompressed variants unless told otherwise
            .set_default("serve.gzip", true)?
            .set_default("serve.brotli", true)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Resolve the listen address; host names such as `localhost` are looked up
    pub fn get_socket_addr(&self) -> std::result::Result<SocketAddr, String> {
        (self.server.host.as_str(), self.server.port)
            .to_socket_addrs()
            .map_err(|e| format!("Invalid address {}:{}: {e}", self.server.host, self.server.port))?
            .next()
            .ok_or_else(|| format!("No address found for host: {}", self.server.host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(cfg.dir, ".");
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.logging.access_log_format, "dev");
        assert!(cfg.serve.gzip);
        assert!(cfg.serve.brotli);
        assert!(!cfg.serve.etag);
        assert_eq!(cfg.serve.extensions, vec!["html", "htm"]);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staticd.toml");
        fs::write(
            &path,
            r#"
dir = "public"

[server]
port = 8080
workers = 2

[serve]
etag = true
max_age = 3600
single = "shell.html"
ignores = ["^/api"]
gzip = false
"#,
        )
        .unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.dir, "public");
        assert_eq!(cfg.server.host, "localhost");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.workers, Some(2));
        assert!(cfg.serve.etag);
        assert_eq!(cfg.serve.max_age, Some(3600));
        assert_eq!(cfg.serve.single, SinglePage::Path("shell.html".to_string()));
        assert_eq!(cfg.serve.ignores, Ignores::Patterns(vec!["^/api".to_string()]));
        assert!(!cfg.serve.gzip);
        assert!(cfg.serve.brotli);
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staticd.toml");
        fs::write(&path, "[server]\nport = \"not a port\"\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(crate::error::ServeError::Config(_))
        ));
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::default();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 8080;
        assert_eq!(cfg.get_socket_addr().unwrap().to_string(), "127.0.0.1:8080");

        cfg.server.host = "localhost".to_string();
        assert!(cfg.get_socket_addr().unwrap().ip().is_loopback());
    }
}
