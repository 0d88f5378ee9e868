//! Static asset server engine
//!
//! Maps request paths onto a directory tree with extension and index
//! assumption, precompressed `.br`/`.gz` negotiation, single-page fallback,
//! weak ETags, `Cache-Control` policies and byte ranges.
//!
//! ```no_run
//! use staticd::{AssetRequest, Engine, ServeOptions};
//!
//! # async fn demo() -> Result<(), staticd::ServeError> {
//! let engine = Engine::new("public", ServeOptions::default())?;
//! let response = engine.handle(&AssetRequest::get("/about")).await;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::ServeOptions;
pub use error::ServeError;
pub use handler::{AssetRequest, Engine, EngineBuilder};
