//! Infrastructure Ports
//!
//! | Port | Description |
//! |------|-------------|
//! | [`RoutingEventSink`] | Receives routing and health events |

/// Routing event sink port
pub mod events;

pub use events::{RoutingEventSink, SharedEventSink};
