//! Domain Port Interfaces
//!
//! Boundary contracts between the routing core and the outside world.
//!
//! - **providers/** - generation backends the router calls
//! - **infrastructure/** - event sinks that observe routing

/// Infrastructure service ports
pub mod infrastructure;
/// External service provider ports
pub mod providers;

pub use infrastructure::{RoutingEventSink, SharedEventSink};
pub use providers::{GenerationProvider, SharedGenerationProvider};
