//! Request handler module
//!
//! The asset engine (dispatch, conditional and range handling) and the
//! hyper service that feeds it.

pub mod engine;
pub mod request;
mod respond;
pub mod service;

// Re-export main entry points
pub use engine::{Engine, EngineBuilder, NoMatchHook, SetHeadersHook};
pub use request::AssetRequest;
pub use service::handle_request;
