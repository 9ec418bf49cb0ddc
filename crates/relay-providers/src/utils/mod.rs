//! Provider Utilities
//!
//! Shared helpers used by adapter implementations.

mod deadline;
mod http_response;

pub use deadline::run_before;
pub use http_response::HttpResponseUtils;
