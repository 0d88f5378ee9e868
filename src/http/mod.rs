//! HTTP protocol layer module
//!
//! Header, caching, range and body primitives used by the engine,
//! decoupled from how assets are found.

pub mod body;
pub mod cache;
pub mod headers;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use body::Body;
pub use range::parse_range_header;
pub use response::{build_304_response, build_404_response, build_416_response};
